// Interface adapters: HTTP wiring, wire protocol and upstream clients.

pub mod clients;
pub mod context;
pub mod handlers;
pub mod http;
pub mod protocol;
pub mod routes;
pub mod state;

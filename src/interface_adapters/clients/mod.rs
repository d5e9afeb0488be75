// The clients defined here are reqwest clients for external services.

pub mod embed;

pub use embed::EmbedPageClient;

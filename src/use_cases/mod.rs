// Use cases layer: application workflows for the host flags service.

pub mod extract_host_flags;
pub mod timing;


pub use extract_host_flags::{ExtractHostFlagsUseCase, ExtractedHostFlags, HostFlagsQuery};

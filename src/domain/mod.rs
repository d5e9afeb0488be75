// Domain layer: extraction rules, error taxonomy and the upstream port.

mod host_flags;

pub use host_flags::{EmbedPageSource, ErrorCode, ExtractionError, find_encrypted_host_flags};

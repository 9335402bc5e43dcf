//! Network probing: the single-shot HTTP fetch and the independent TLS
//! certificate expiry lookup used by the check orchestrator.

pub mod http;
pub mod tls;

pub use http::{MAX_REDIRECTS, ProbeResponse, probe_url};
pub use tls::certificate_days_remaining;

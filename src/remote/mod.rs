mod client;

pub use client::{ProgressClient, RemoteError, Verdict};

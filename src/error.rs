use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("memory profiling is not available on this platform")]
    MemoryProfilingUnavailable,
}

//! Application layer for the Scriba pipeline: prompt assembly, the
//! generation gateway service, and the session use case that drives the
//! assembler -> gateway round trip.

pub mod gateway;
pub mod prompt;
pub mod session;

pub use gateway::{GenerationService, SYSTEM_PROMPT};
pub use prompt::PromptAssembler;
pub use session::SessionUseCase;

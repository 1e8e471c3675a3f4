//! Branching narrative: story content, prompts, the generator protocol
//! and reply parsing.
//!
//! ## Key Types
//!
//! - `Chapter` / `StoryPiece` / `StoryNext`: Story graph
//! - `City` / `CityCatalog`: Starting cities, in display order
//! - `NarrativeRequest` / `RequestTicket`: Outbound request and its identity
//! - `NarrativeGenerator`: Host-supplied text source
//! - `parse_response`: Lenient reply parser

pub mod content;
pub mod generator;
pub mod parser;
pub mod prompt;

pub use content::{find_piece, Chapter, City, CityCatalog, StoryCatalog, StoryNext, StoryPiece};
pub use generator::{
    EchoGenerator, NarrativeContext, NarrativeGenerator, NarrativeRequest, RequestPurpose, RequestTicket,
    ScriptedGenerator,
};
pub use parser::{parse_response, ParsedNarration, FALLBACK_OPTIONS, OPTIONS_MARKER};
pub use prompt::system_prompt;

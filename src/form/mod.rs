// Form coordination: the pieces the session engine composes. Everything here
// is synchronous state except the debouncer's timer.

pub mod debounce;
pub mod generation;
pub mod sequencer;
pub mod suggest;
pub mod view;

pub use debounce::Debouncer;
pub use generation::{GENERIC_FAILURE, GenerateTicket, GenerationController, GenerationState};
pub use sequencer::{PrLookup, PrLookupSequencer};
pub use suggest::{Resolution, StreamKind, SuggestionStream, Ticket};
pub use view::ViewState;

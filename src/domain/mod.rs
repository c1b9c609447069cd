pub mod board_state;
pub mod card;
pub mod error;
pub mod status;
pub mod validation;

pub use board_state::BoardState;
pub use card::{Board, Card, Project};
pub use error::{KanbanError, MoveError};
pub use status::CardStatus;

pub type ProjectId = i64;
pub type BoardId = i64;
pub type CardId = i64;
pub type UserId = i64;

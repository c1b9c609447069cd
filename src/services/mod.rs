pub mod board_service;
pub mod reconciler;

pub use board_service::BoardService;
pub use reconciler::{
    BoardReconciler, MoveOutcome, MovePhase, MoveRequest, MoveStart, Notice, PendingMove,
};

use super::{BoardId, CardId};

#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Move(#[from] MoveError),
}

impl KanbanError {
    /// Maps a non-2xx status and the envelope's `meta.message` to an error.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| default_status_message(status).to_string());
        match status {
            400 | 422 => KanbanError::BadRequest(message),
            401 => KanbanError::Unauthorized(message),
            403 => KanbanError::Forbidden(message),
            404 => KanbanError::NotFound(message),
            _ => KanbanError::Server { status, message },
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            KanbanError::Unauthorized(_) => "session expired, please sign in again".into(),
            KanbanError::Forbidden(_) => "insufficient permissions".into(),
            KanbanError::NotFound(_) => "the item no longer exists".into(),
            KanbanError::BadRequest(msg) => format!("invalid request: {msg}"),
            KanbanError::Server { .. } => "server error, please try again later".into(),
            KanbanError::Transport(_) => "network error, check your connection".into(),
            KanbanError::Serialization(_) | KanbanError::UnexpectedResponse(_) => {
                "unexpected response from server".into()
            }
            KanbanError::Move(err) => err.to_string(),
        }
    }

    /// Only transient failures are worth a fresh attempt by the user.
    pub fn is_retriable(&self) -> bool {
        matches!(self, KanbanError::Server { .. } | KanbanError::Transport(_))
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown Error",
    }
}

/// Rejected preconditions on the local board state. None of these touch state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("unknown board: {0}")]
    UnknownBoard(BoardId),

    #[error("unknown card: {0}")]
    UnknownCard(CardId),

    #[error("index {index} is out of range for board {board_id}")]
    IndexOutOfRange { board_id: BoardId, index: usize },

    #[error("card {card_id} is not at index {index} of board {board_id}")]
    CardMismatch {
        card_id: CardId,
        board_id: BoardId,
        index: usize,
    },

    #[error("card {0} is already being moved")]
    CardBusy(CardId),

    #[error("board {0} already exists")]
    DuplicateBoard(BoardId),

    #[error("card {0} already exists")]
    DuplicateCard(CardId),
}

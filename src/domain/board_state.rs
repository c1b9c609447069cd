use std::collections::{HashMap, HashSet};

use super::{Board, BoardId, Card, CardId, MoveError, ProjectId};

/// Local snapshot of one project's boards and cards.
///
/// Every card sits in exactly one board's list and its `board_id` names that
/// board. The mutators below keep that partition intact; the reconciler uses
/// the crate-private `take_at`/`put_at` pair for its optimistic phase.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    project_id: ProjectId,
    boards: Vec<Board>,
    cards: HashMap<CardId, Card>,
}

impl BoardState {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            boards: Vec::new(),
            cards: HashMap::new(),
        }
    }

    /// Builds a state from server listings. Cards naming an unknown board and
    /// repeated card ids are dropped.
    pub fn from_parts(project_id: ProjectId, boards: Vec<Board>, cards: Vec<Card>) -> Self {
        let mut state = Self::new(project_id);
        for mut board in boards {
            if state.board(board.id).is_some() {
                tracing::warn!(board_id = board.id, "Duplicate board in listing, skipping");
                continue;
            }
            board.cards.clear();
            state.boards.push(board);
        }

        for card in cards {
            let card_id = card.id;
            let board_id = card.board_id;
            if let Err(e) = state.insert_card(card) {
                tracing::warn!(card_id, board_id, "Dropping card from listing: {}", e);
            }
        }

        state
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, board_id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    fn board_mut(&mut self, board_id: BoardId) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == board_id)
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.get(&card_id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Cards of a board in display order.
    pub fn cards_in(&self, board_id: BoardId) -> Option<Vec<&Card>> {
        let board = self.board(board_id)?;
        Some(board.cards.iter().filter_map(|id| self.cards.get(id)).collect())
    }

    /// The board currently holding `card_id` and its index there.
    pub fn location(&self, card_id: CardId) -> Option<(BoardId, usize)> {
        self.boards
            .iter()
            .find_map(|b| b.position_of(card_id).map(|idx| (b.id, idx)))
    }

    pub fn insert_board(&mut self, board: Board) -> Result<(), MoveError> {
        if self.board(board.id).is_some() {
            return Err(MoveError::DuplicateBoard(board.id));
        }
        self.boards.push(Board {
            cards: Vec::new(),
            ..board
        });
        Ok(())
    }

    pub fn rename_board(&mut self, board_id: BoardId, title: &str) -> Result<(), MoveError> {
        let board = self
            .board_mut(board_id)
            .ok_or(MoveError::UnknownBoard(board_id))?;
        board.title = title.to_string();
        Ok(())
    }

    /// Removes a board together with every card it holds.
    pub fn remove_board(&mut self, board_id: BoardId) -> Option<(Board, Vec<Card>)> {
        let idx = self.boards.iter().position(|b| b.id == board_id)?;
        let board = self.boards.remove(idx);
        let cards = board
            .cards
            .iter()
            .filter_map(|id| self.cards.remove(id))
            .collect();
        Some((board, cards))
    }

    /// Appends a new card to the end of the board named by `card.board_id`.
    pub fn insert_card(&mut self, card: Card) -> Result<(), MoveError> {
        if self.cards.contains_key(&card.id) {
            return Err(MoveError::DuplicateCard(card.id));
        }
        let board = self
            .board_mut(card.board_id)
            .ok_or(MoveError::UnknownBoard(card.board_id))?;
        board.cards.push(card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Replaces a card's fields with a fresher copy. A changed `board_id`
    /// relocates the card to the end of its new board.
    pub fn replace_card(&mut self, card: Card) -> Result<(), MoveError> {
        let current_board = self
            .cards
            .get(&card.id)
            .map(|c| c.board_id)
            .ok_or(MoveError::UnknownCard(card.id))?;

        if current_board != card.board_id {
            if self.board(card.board_id).is_none() {
                return Err(MoveError::UnknownBoard(card.board_id));
            }
            self.detach(card.id);
            if let Some(board) = self.board_mut(card.board_id) {
                board.cards.push(card.id);
            }
        }

        self.cards.insert(card.id, card);
        Ok(())
    }

    pub fn remove_card(&mut self, card_id: CardId) -> Option<Card> {
        self.detach(card_id);
        self.cards.remove(&card_id)
    }

    /// Takes the card id at `index` out of a board's list. The card stays in
    /// the card table, so the partition is broken until `put_at` runs.
    pub(crate) fn take_at(&mut self, board_id: BoardId, index: usize) -> Option<CardId> {
        let board = self.board_mut(board_id)?;
        (index < board.cards.len()).then(|| board.cards.remove(index))
    }

    /// Inserts a card id into a board's list, clamping `index` to append, and
    /// points the card at that board. Returns the index actually used.
    pub(crate) fn put_at(&mut self, card_id: CardId, board_id: BoardId, index: usize) -> Option<usize> {
        let board = self.board_mut(board_id)?;
        let index = index.min(board.cards.len());
        board.cards.insert(index, card_id);
        if let Some(card) = self.cards.get_mut(&card_id) {
            card.board_id = board_id;
        }
        Some(index)
    }

    pub(crate) fn detach(&mut self, card_id: CardId) -> Option<(BoardId, usize)> {
        let (board_id, idx) = self.location(card_id)?;
        self.board_mut(board_id)?.cards.remove(idx);
        Some((board_id, idx))
    }

    /// True when board lists partition the card table exactly.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        for board in &self.boards {
            for id in &board.cards {
                let Some(card) = self.cards.get(id) else {
                    return false;
                };
                if card.board_id != board.id || !seen.insert(*id) {
                    return false;
                }
            }
        }
        seen.len() == self.cards.len()
    }
}

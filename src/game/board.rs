//! Board geometry, piece encoding and the mask/unmask transform pair
//!
//! A board is one byte per cell. Masking XORs every cell with a keystream
//! derived from the player's mask secret, so the transform is its own
//! inverse and `unmask(mask(b, k), k) == b` holds for every board.

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::commitment::{Digest, Secret, FIELD_BYTES};
use crate::config::{GameConfig, MAX_SUPPORTED_BOARD_PARAM};
use crate::error::{GameResult, ProtocolError};
use super::player::Seat;

const MASK_DOMAIN: &[u8] = b"masked-chess/mask";

/// Square side length of a board, always a power of two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSize")]
pub struct BoardSize {
    dimension: u8,
}

#[derive(Deserialize)]
struct RawBoardSize {
    dimension: u8,
}

impl TryFrom<RawBoardSize> for BoardSize {
    type Error = ProtocolError;

    fn try_from(raw: RawBoardSize) -> GameResult<Self> {
        let dimension = raw.dimension;
        if !dimension.is_power_of_two() || dimension.trailing_zeros() > MAX_SUPPORTED_BOARD_PARAM {
            return Err(ProtocolError::invalid_parameter(
                "board_size",
                format!("{} is not a supported board dimension", dimension),
            ));
        }
        Ok(Self { dimension })
    }
}

impl BoardSize {
    /// Parameter of the standard 8x8 board
    pub const STANDARD_PARAM: u32 = 3;

    /// Build a board size from a size parameter (`dimension = 2^param`),
    /// rejecting parameters outside the configured range.
    pub fn from_param(param: u32, config: &GameConfig) -> GameResult<Self> {
        if param < config.min_board_param || param > config.max_board_param {
            return Err(ProtocolError::invalid_parameter(
                "board_size_param",
                format!(
                    "{} is outside the supported range {}..={}",
                    param, config.min_board_param, config.max_board_param
                ),
            ));
        }

        let dimension = 1u32
            .checked_shl(param)
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| {
                ProtocolError::invalid_parameter(
                    "board_size_param",
                    format!("{} is too large", param),
                )
            })?;

        Ok(Self { dimension })
    }

    /// The standard 8x8 board
    pub fn standard() -> Self {
        Self { dimension: 8 }
    }

    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// The parameter this size was built from
    pub fn param(&self) -> u32 {
        self.dimension.trailing_zeros()
    }

    pub fn cell_count(&self) -> usize {
        usize::from(self.dimension) * usize::from(self.dimension)
    }

    pub fn contains(&self, row: u8, col: u8) -> bool {
        row < self.dimension && col < self.dimension
    }

    /// Validated square constructor
    pub fn square(&self, row: u8, col: u8) -> GameResult<Square> {
        if !self.contains(row, col) {
            return Err(ProtocolError::OutOfBounds {
                row,
                col,
                size: self.dimension,
            });
        }
        Ok(Square { row, col })
    }

    fn index(&self, square: Square) -> usize {
        usize::from(square.row) * usize::from(self.dimension) + usize::from(square.col)
    }
}

/// A (row, col) coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Chess-like piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece together with its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub seat: Seat,
}

const BLACK_FLAG: u8 = 8;

impl Piece {
    pub fn new(kind: PieceKind, seat: Seat) -> Self {
        Self { kind, seat }
    }

    /// Single-byte cell encoding; 0 is reserved for an empty cell
    pub fn encode(&self) -> u8 {
        match self.seat {
            Seat::White => self.kind as u8,
            Seat::Black => self.kind as u8 | BLACK_FLAG,
        }
    }

    /// Decode a cell byte. Returns `None` for empty or unrecognised cells.
    pub fn decode(code: u8) -> Option<Self> {
        let seat = if code & BLACK_FLAG != 0 { Seat::Black } else { Seat::White };
        if code & !(BLACK_FLAG | 0x07) != 0 {
            return None;
        }
        PieceKind::from_code(code & 0x07).map(|kind| Piece { kind, seat })
    }
}

/// Persisted form of `Board` and `MaskedBoard`, checked before use
#[derive(Deserialize)]
struct RawCells {
    size: BoardSize,
    cells: Vec<u8>,
}

impl RawCells {
    fn checked(self) -> GameResult<(BoardSize, Vec<u8>)> {
        if self.cells.len() != self.size.cell_count() {
            return Err(ProtocolError::invalid_parameter(
                "cells",
                format!(
                    "{} cells for a {}x{} board",
                    self.cells.len(),
                    self.size.dimension(),
                    self.size.dimension()
                ),
            ));
        }
        Ok((self.size, self.cells))
    }
}

/// Plaintext board as seen by its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCells")]
pub struct Board {
    size: BoardSize,
    cells: Vec<u8>,
}

impl Board {
    pub fn empty(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![0; size.cell_count()],
        }
    }

    /// Starting position for one seat.
    ///
    /// Only the owner's pieces are placed; opponent positions are hidden
    /// information and never appear in a private view.
    pub fn starting(size: BoardSize, seat: Seat) -> Self {
        let mut board = Self::empty(size);
        let n = size.dimension();
        let (back_row, pawn_row) = match seat {
            Seat::White => (0, 1),
            Seat::Black => (n - 1, n.saturating_sub(2)),
        };

        for col in 0..n {
            let kind = back_rank_kind(n, col);
            board.place(Square { row: back_row, col }, Piece::new(kind, seat));
            if n >= 4 {
                board.place(Square { row: pawn_row, col }, Piece::new(PieceKind::Pawn, seat));
            }
        }
        board
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells
            .get(self.size.index(square))
            .and_then(|code| Piece::decode(*code))
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.cells.get(self.size.index(square)) == Some(&0)
    }

    /// Put `piece` on `square`, replacing whatever was there
    pub fn place(&mut self, square: Square, piece: Piece) {
        let index = self.size.index(square);
        self.cells[index] = piece.encode();
    }

    pub fn clear(&mut self, square: Square) {
        let index = self.size.index(square);
        self.cells[index] = 0;
    }

    /// All occupied squares with their pieces, row-major
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        let n = self.size.dimension();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| Square { row, col }))
            .filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
            .collect()
    }
}

impl TryFrom<RawCells> for Board {
    type Error = ProtocolError;

    fn try_from(raw: RawCells) -> GameResult<Self> {
        let (size, cells) = raw.checked()?;
        Ok(Self { size, cells })
    }
}

fn back_rank_kind(n: u8, col: u8) -> PieceKind {
    if col == n / 2 {
        PieceKind::King
    } else if n >= 2 && col == n / 2 - 1 {
        PieceKind::Queen
    } else if col == 0 || col == n - 1 {
        PieceKind::Rook
    } else if col == 1 || col == n - 2 {
        PieceKind::Knight
    } else {
        PieceKind::Bishop
    }
}

/// Board cells obscured under a mask secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCells")]
pub struct MaskedBoard {
    size: BoardSize,
    cells: Vec<u8>,
}

impl TryFrom<RawCells> for MaskedBoard {
    type Error = ProtocolError;

    fn try_from(raw: RawCells) -> GameResult<Self> {
        let (size, cells) = raw.checked()?;
        Ok(Self { size, cells })
    }
}

impl MaskedBoard {
    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

/// Hide `board` under `secret`
pub fn mask(board: &Board, secret: &Secret) -> MaskedBoard {
    MaskedBoard {
        size: board.size,
        cells: apply_keystream(&board.cells, secret),
    }
}

/// Recover the plaintext board. With the wrong secret this yields garbage
/// cells rather than an error; callers learn that when no piece decodes.
pub fn unmask(masked: &MaskedBoard, secret: &Secret) -> Board {
    Board {
        size: masked.size,
        cells: apply_keystream(&masked.cells, secret),
    }
}

fn apply_keystream(cells: &[u8], secret: &Secret) -> Vec<u8> {
    let mut out = Vec::with_capacity(cells.len());
    for (block, chunk) in cells.chunks(FIELD_BYTES).enumerate() {
        let block_index = block as u32;
        let pad = Digest::of_parts(&[MASK_DOMAIN, secret.as_bytes(), &block_index.to_be_bytes()]);
        out.extend(chunk.iter().zip(pad.as_bytes()).map(|(cell, key)| cell ^ key));
    }
    out
}

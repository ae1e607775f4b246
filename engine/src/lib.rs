//! 쇼기(将棋) 규칙 엔진
//!
//! `Board`가 행마 판정과 상태 변경을 맡고, `Game`은 클릭 이벤트를
//! 받아 선택/이동/승격 확인/차례 넘김을 진행한다.

use std::fmt;

pub mod board;
pub mod error;

pub use board::{Board, Kiki, KikiMap, Location, MoveOutcome, NARI_ZONE_DEPTH};
pub use error::{EngineError, EngineResult};
pub use koma::{Koma, KomaId, KomaIdAllocator, KomaKind, Ray, Side, BOARD_SIDE};

/// 보드 좌표 (1-indexed: col=1~9 (筋), row=1~9 (段))
///
/// row 1이 후수 쪽 끝, row 9가 선수 쪽 끝이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub col: i32,
    pub row: i32,
}

impl Coordinate {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// "76" 같은 문자열에서 파싱 (열, 단 순서)
    pub fn from_notation(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let col = chars.next()?.to_digit(10)? as i32;
        let row = chars.next()?.to_digit(10)? as i32;
        if chars.next().is_some() {
            return None;
        }
        let coord = Self { col, row };
        coord.is_valid().then_some(coord)
    }

    pub fn to_notation(&self) -> String {
        format!("{}{}", self.col, self.row)
    }

    pub fn is_valid(&self) -> bool {
        (1..=BOARD_SIDE).contains(&self.col) && (1..=BOARD_SIDE).contains(&self.row)
    }

    pub fn offset(&self, col: i32, row: i32) -> Self {
        Self::new(self.col + col, self.row + row)
    }

    /// 보드 중심 기준 180도 회전
    pub fn rotated(&self) -> Self {
        Self::new(BOARD_SIDE + 1 - self.col, BOARD_SIDE + 1 - self.row)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col, self.row)
    }
}

/// 입력 처리 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 들고 있는 기물 없음
    Idle,
    /// 기물 선택됨
    Holding(KomaId),
    /// 이동은 끝났고 승격 여부 응답 대기. 다른 입력은 무시
    NariConfirm(KomaId),
}

/// 게임 상태
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    teme: u32,
    phase: Phase,
    pub debug_mode: bool, // 수가 확정될 때마다 보드를 로그로 출력
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// 평수 초기 배치로 시작
    pub fn new() -> Self {
        let mut alloc = KomaIdAllocator::new();
        Self::with_board(Board::hirate(&mut alloc))
    }

    /// 임의 배치로 시작 (1수째, 선수 차례)
    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            teme: 1,
            phase: Phase::Idle,
            debug_mode: false,
        }
    }

    // === 이벤트 처리 ===

    /// 기물 클릭 (보드 위 또는 지참 기물)
    pub fn on_piece_selected(&mut self, id: KomaId) {
        let holding = match self.phase {
            Phase::NariConfirm(_) => return,
            Phase::Idle => None,
            Phase::Holding(held) => Some(held),
        };
        let Some(side) = self.board.koma(id).map(|koma| koma.side()) else {
            log::warn!("존재하지 않는 기물 {} 선택", id);
            return;
        };

        match holding {
            None => {
                if side == self.side_to_move() {
                    log::debug!("선택: 기물 {}", id);
                    self.phase = Phase::Holding(id);
                }
            }
            Some(held) if held == id => {
                log::debug!("선택 취소: 기물 {}", id);
                self.phase = Phase::Idle;
            }
            Some(held) => {
                let held_side = self.board.koma(held).map(|koma| koma.side());
                if held_side != Some(side) {
                    let outcome = self.board.take_koma(held, id);
                    self.handle_move_outcome(held, outcome);
                }
                // 같은 편 다른 기물은 무시 (선택 전환 없음)
            }
        }
    }

    /// 빈 칸 클릭
    pub fn on_square_selected(&mut self, coord: Coordinate) {
        let Phase::Holding(held) = self.phase else {
            return;
        };
        // 기물이 있는 칸은 기물 클릭으로 들어와야 한다
        if self.board.get_koma(coord).is_some() {
            return;
        }

        let outcome = self.board.move_koma(held, coord);
        self.handle_move_outcome(held, outcome);
    }

    /// 승격 확인 응답
    pub fn on_promotion_answered(&mut self, naru: bool) -> EngineResult<()> {
        let id = match self.phase {
            Phase::NariConfirm(id) => id,
            // 확인 대기가 아니어도 들고 있는 기물에 그대로 적용된다
            Phase::Holding(id) => {
                log::warn!("승격 확인 대기 중이 아닌데 응답이 들어옴 (기물 {})", id);
                id
            }
            Phase::Idle => {
                log::warn!("들고 있는 기물 없이 승격 응답이 들어옴");
                return Err(EngineError::NoHoldingKoma);
            }
        };

        if naru {
            self.board.naru(id);
            log::debug!("승격: 기물 {}", id);
        }
        self.advance_turn();
        Ok(())
    }

    fn handle_move_outcome(&mut self, held: KomaId, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Ng => {}
            MoveOutcome::NariConfirm => {
                log::debug!("승격 확인 요청: 기물 {}", held);
                self.phase = Phase::NariConfirm(held);
            }
            MoveOutcome::Ok => self.advance_turn(),
        }
    }

    fn advance_turn(&mut self) {
        self.teme += 1;
        self.phase = Phase::Idle;
        log::debug!("{}수째, {:?} 차례", self.teme, self.side_to_move());
        if self.debug_mode {
            log::debug!("\n{}", self.board);
        }
    }

    // === 조회 ===

    pub fn teme(&self) -> u32 {
        self.teme
    }

    pub fn is_senteban(&self) -> bool {
        self.teme % 2 == 1
    }

    pub fn is_goteban(&self) -> bool {
        !self.is_senteban()
    }

    pub fn side_to_move(&self) -> Side {
        if self.is_senteban() {
            Side::Sente
        } else {
            Side::Gote
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_nari_confirm_shown(&self) -> bool {
        matches!(self.phase, Phase::NariConfirm(_))
    }

    pub fn holding_koma(&self) -> Option<&Koma> {
        match self.phase {
            Phase::Idle => None,
            Phase::Holding(id) | Phase::NariConfirm(id) => self.board.koma(id),
        }
    }

    pub fn get_koma(&self, coord: Coordinate) -> Option<&Koma> {
        self.board.get_koma(coord)
    }

    pub fn sente_mochigomas(&self) -> Vec<&Koma> {
        self.board.sente_mochigomas()
    }

    pub fn gote_mochigomas(&self) -> Vec<&Koma> {
        self.board.gote_mochigomas()
    }

    pub fn calc_kiki(&self) -> Kiki {
        self.board.calc_kiki()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

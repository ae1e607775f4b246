//! 엔진 오류 타입
//!
//! 규칙상 불가능한 수는 오류가 아니라 `MoveOutcome::Ng`로 돌려준다.
//! 여기 있는 오류는 호출 순서가 잘못되었거나 배치 자체가 깨진 경우다.

use koma::KomaId;
use thiserror::Error;

use crate::Coordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 승격 응답이 왔는데 들고 있는 기물이 없음
    #[error("승격 응답 시점에 들고 있는 기물이 없습니다")]
    NoHoldingKoma,

    /// 배치 좌표가 보드 밖
    #[error("보드 밖 좌표입니다: {0}")]
    OutOfBoard(Coordinate),

    /// 같은 칸에 기물이 둘 이상
    #[error("{0} 칸에 기물이 이미 있습니다")]
    DuplicateSquare(Coordinate),

    /// 같은 id가 두 번 이상 등장
    #[error("기물 id {0}가 중복되었습니다")]
    DuplicateKoma(KomaId),
}

pub type EngineResult<T> = Result<T, EngineError>;

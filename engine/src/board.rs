//! 보드: 9x9 칸, 공용 지참 기물(持ち駒) 풀, 기물 위치 색인

use std::collections::HashMap;
use std::fmt;

use koma::{Koma, KomaId, KomaIdAllocator, KomaKind, Side, BOARD_SIDE};

use crate::error::{EngineError, EngineResult};
use crate::Coordinate;

/// 승격 구역 깊이 (선수: 1~3단, 후수: 7~9단)
pub const NARI_ZONE_DEPTH: i32 = 3;

/// 기물 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    OnBoard(Coordinate),
    Mochigoma,
}

/// 이동/잡기/착수 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// 적용됨
    Ok,
    /// 불가능한 수. 상태 변화 없음
    Ng,
    /// 적용됨. 승격 여부를 따로 물어야 함
    NariConfirm,
}

/// 칸마다 몇 개의 기물이 닿는지 센 표
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KikiMap {
    counts: [[u32; BOARD_SIDE as usize]; BOARD_SIDE as usize],
}

impl KikiMap {
    /// 보드 밖 좌표는 0
    pub fn count(&self, coord: Coordinate) -> u32 {
        if !coord.is_valid() {
            return 0;
        }
        self.counts[(coord.col - 1) as usize][(coord.row - 1) as usize]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    /// `[col - 1][row - 1]` 순서의 원본 표
    pub fn as_grid(&self) -> &[[u32; BOARD_SIDE as usize]; BOARD_SIDE as usize] {
        &self.counts
    }

    fn add(&mut self, coord: Coordinate) {
        self.counts[(coord.col - 1) as usize][(coord.row - 1) as usize] += 1;
    }
}

/// 양 진영의 기키(利き) 표
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kiki {
    pub sente: KikiMap,
    pub gote: KikiMap,
}

impl Kiki {
    pub fn for_side(&self, side: Side) -> &KikiMap {
        match side {
            Side::Sente => &self.sente,
            Side::Gote => &self.gote,
        }
    }
}

/// 한 칸에 대한 행마 판정. 가까운 칸부터 차례로 호출해야 한다
enum Movability {
    Ok,
    OkAndStop,
    NotOk,
}

/// 보드 상태
///
/// 모든 기물은 `grid`의 한 칸 또는 `mochigomas` 중 정확히 한 곳에만 있다.
/// `locations`는 이 둘의 역색인이며 같은 메서드 안에서 함께 갱신된다.
#[derive(Debug, Clone, Default)]
pub struct Board {
    komas: HashMap<KomaId, Koma>,
    grid: HashMap<Coordinate, KomaId>,
    locations: HashMap<KomaId, Location>,
    mochigomas: Vec<KomaId>,
}

impl Board {
    /// 빈 보드
    pub fn empty() -> Self {
        Self::default()
    }

    /// 임의 배치로 보드 생성 (좌표/id 검증)
    pub fn new(
        initial_komas: Vec<(Coordinate, Koma)>,
        mochigomas: Vec<Koma>,
    ) -> EngineResult<Self> {
        let mut board = Self::empty();

        for (coord, koma) in initial_komas {
            if !coord.is_valid() {
                return Err(EngineError::OutOfBoard(coord));
            }
            if board.grid.contains_key(&coord) {
                return Err(EngineError::DuplicateSquare(coord));
            }
            if board.komas.contains_key(&koma.id()) {
                return Err(EngineError::DuplicateKoma(koma.id()));
            }
            board.place(coord, koma);
        }

        for koma in mochigomas {
            if board.komas.contains_key(&koma.id()) {
                return Err(EngineError::DuplicateKoma(koma.id()));
            }
            board.locations.insert(koma.id(), Location::Mochigoma);
            board.mochigomas.push(koma.id());
            board.komas.insert(koma.id(), koma);
        }

        Ok(board)
    }

    /// 평수(平手) 초기 배치
    pub fn hirate(alloc: &mut KomaIdAllocator) -> Self {
        let mut board = Self::empty();
        for (coord, koma) in hirate_layout(alloc) {
            board.place(coord, koma);
        }
        board
    }

    fn place(&mut self, coord: Coordinate, koma: Koma) {
        let id = koma.id();
        self.grid.insert(coord, id);
        self.locations.insert(id, Location::OnBoard(coord));
        self.komas.insert(id, koma);
    }

    /// 1~9열, 각 열 안에서 1~9단 순서
    pub fn all_coordinates() -> impl Iterator<Item = Coordinate> {
        (1..=BOARD_SIDE).flat_map(|col| (1..=BOARD_SIDE).map(move |row| Coordinate::new(col, row)))
    }

    pub fn get_koma(&self, coord: Coordinate) -> Option<&Koma> {
        self.grid.get(&coord).and_then(|id| self.komas.get(id))
    }

    pub fn koma(&self, id: KomaId) -> Option<&Koma> {
        self.komas.get(&id)
    }

    pub fn coordinate_for(&self, id: KomaId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    /// 보드 위 기물 목록 (좌표 순)
    pub fn komas_on_board(&self) -> Vec<(Coordinate, &Koma)> {
        Self::all_coordinates()
            .filter_map(|coord| self.get_koma(coord).map(|koma| (coord, koma)))
            .collect()
    }

    /// 전체 기물 수 (보드 + 지참 기물)
    pub fn koma_count(&self) -> usize {
        self.komas.len()
    }

    /// 이동. 지참 기물이면 착수로 처리한다.
    ///
    /// 도착 칸에 상대 기물이 있으면 같이 잡는다.
    /// 승격 구역에 걸친 수는 이동을 먼저 적용한 뒤 `NariConfirm`을 돌려준다.
    pub fn move_koma(&mut self, id: KomaId, to: Coordinate) -> MoveOutcome {
        let from = match self.coordinate_for(id) {
            Some(Location::OnBoard(coord)) => coord,
            Some(Location::Mochigoma) => return self.put_mochigoma(id, to),
            None => return MoveOutcome::Ng,
        };

        if !self.can_move_to(from, to) {
            return MoveOutcome::Ng;
        }
        self.blindly_move_koma(id, from, to);

        match self.komas.get(&id) {
            Some(koma) if can_naru(koma, from, to) => MoveOutcome::NariConfirm,
            _ => MoveOutcome::Ok,
        }
    }

    /// 잡기. 두 기물 모두 보드 위에 있어야 한다
    pub fn take_koma(&mut self, taker: KomaId, taken: KomaId) -> MoveOutcome {
        let taker_on_board = matches!(self.coordinate_for(taker), Some(Location::OnBoard(_)));
        let taken_coord = match self.coordinate_for(taken) {
            Some(Location::OnBoard(coord)) => coord,
            _ => return MoveOutcome::Ng,
        };
        if !taker_on_board {
            return MoveOutcome::Ng;
        }

        // 잡힌 기물 처리는 move_koma 안에서 이동과 함께 이루어진다
        self.move_koma(taker, taken_coord)
    }

    /// 지참 기물 착수
    pub fn put_mochigoma(&mut self, id: KomaId, to: Coordinate) -> MoveOutcome {
        if !to.is_valid() || self.grid.contains_key(&to) {
            return MoveOutcome::Ng;
        }
        let Some(idx) = self.mochigomas.iter().position(|&m| m == id) else {
            return MoveOutcome::Ng;
        };

        self.mochigomas.remove(idx);
        self.grid.insert(to, id);
        self.locations.insert(id, Location::OnBoard(to));
        log::debug!("착수: 기물 {} -> {}", id, to);
        MoveOutcome::Ok
    }

    /// 승격. 기물이 없으면 false
    pub fn naru(&mut self, id: KomaId) -> bool {
        match self.komas.get_mut(&id) {
            Some(koma) => {
                koma.naru();
                true
            }
            None => false,
        }
    }

    pub fn mochigomas(&self, side: Side) -> Vec<&Koma> {
        self.mochigomas
            .iter()
            .filter_map(|id| self.komas.get(id))
            .filter(|koma| koma.side() == side)
            .collect()
    }

    pub fn sente_mochigomas(&self) -> Vec<&Koma> {
        self.mochigomas(Side::Sente)
    }

    pub fn gote_mochigomas(&self) -> Vec<&Koma> {
        self.mochigomas(Side::Gote)
    }

    fn can_move_to(&self, from: Coordinate, to: Coordinate) -> bool {
        self.calc_kiki_for_single_koma(from).contains(&to)
    }

    fn movability(&self, koma: &Koma, coord: Coordinate) -> Movability {
        if !coord.is_valid() {
            return Movability::NotOk;
        }
        match self.get_koma(coord) {
            None => Movability::Ok,
            Some(other) if other.side() == koma.side() => Movability::NotOk,
            Some(_) => Movability::OkAndStop,
        }
    }

    /// 한 칸의 기물이 닿는 칸 목록
    pub fn calc_kiki_for_single_koma(&self, coord: Coordinate) -> Vec<Coordinate> {
        let Some(koma) = self.get_koma(coord) else {
            return Vec::new();
        };

        let mut reachable = Vec::new();
        for ray in koma.movements() {
            for (dc, dr) in ray.offsets() {
                let target = coord.offset(dc, dr);
                match self.movability(koma, target) {
                    Movability::NotOk => break,
                    Movability::Ok => reachable.push(target),
                    Movability::OkAndStop => {
                        reachable.push(target);
                        break;
                    }
                }
            }
        }
        reachable
    }

    /// 보드 전체 기키
    pub fn calc_kiki(&self) -> Kiki {
        let mut kiki = Kiki::default();
        for coord in Self::all_coordinates() {
            let Some(koma) = self.get_koma(coord) else {
                continue;
            };
            let map = match koma.side() {
                Side::Sente => &mut kiki.sente,
                Side::Gote => &mut kiki.gote,
            };
            for target in self.calc_kiki_for_single_koma(coord) {
                map.add(target);
            }
        }
        kiki
    }

    fn blindly_move_koma(&mut self, id: KomaId, from: Coordinate, to: Coordinate) {
        if let Some(victim) = self.grid.get(&to).copied() {
            self.blindly_koma_taken(victim);
        }
        self.grid.remove(&from);
        self.grid.insert(to, id);
        self.locations.insert(id, Location::OnBoard(to));
    }

    fn blindly_koma_taken(&mut self, id: KomaId) {
        if let Some(Location::OnBoard(coord)) = self.locations.get(&id).copied() {
            self.grid.remove(&coord);
        }
        if let Some(koma) = self.komas.get_mut(&id) {
            koma.taken();
            log::debug!("잡힘: 기물 {} ({}) -> {:?} 지참", id, koma.character(), koma.side());
        }
        self.locations.insert(id, Location::Mochigoma);
        self.mochigomas.push(id);
    }
}

fn can_naru(koma: &Koma, from: Coordinate, to: Coordinate) -> bool {
    if koma.is_nari() {
        return false;
    }
    match koma.side() {
        Side::Sente => from.row <= NARI_ZONE_DEPTH || to.row <= NARI_ZONE_DEPTH,
        Side::Gote => {
            let zone_start = BOARD_SIDE - NARI_ZONE_DEPTH + 1;
            from.row >= zone_start || to.row >= zone_start
        }
    }
}

fn hirate_layout(alloc: &mut KomaIdAllocator) -> Vec<(Coordinate, Koma)> {
    const BACK_RANK: [(i32, KomaKind); 9] = [
        (5, KomaKind::Gyoku),
        (4, KomaKind::Kin),
        (6, KomaKind::Kin),
        (3, KomaKind::Gin),
        (7, KomaKind::Gin),
        (2, KomaKind::Kema),
        (8, KomaKind::Kema),
        (1, KomaKind::Kyosha),
        (9, KomaKind::Kyosha),
    ];

    let mut layout = Vec::with_capacity(40);
    for (side, back, fu, hisha, kaku) in [
        (Side::Sente, 9, 7, Coordinate::new(2, 8), Coordinate::new(8, 8)),
        (Side::Gote, 1, 3, Coordinate::new(8, 2), Coordinate::new(2, 2)),
    ] {
        for (col, kind) in BACK_RANK {
            layout.push((Coordinate::new(col, back), alloc.create(kind, side)));
        }
        // 후수는 각행이 먼저 (2,2), 그 다음 비차 (8,2)
        let majors = match side {
            Side::Sente => [(hisha, KomaKind::Hisha), (kaku, KomaKind::Kaku)],
            Side::Gote => [(kaku, KomaKind::Kaku), (hisha, KomaKind::Hisha)],
        };
        for (coord, kind) in majors {
            layout.push((coord, alloc.create(kind, side)));
        }
        for col in 1..=BOARD_SIDE {
            layout.push((Coordinate::new(col, fu), alloc.create(KomaKind::Fu, side)));
        }
    }
    layout
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = |side: Side| {
            self.mochigomas(side)
                .iter()
                .map(|koma| koma.character())
                .collect::<Vec<_>>()
                .join("")
        };

        writeln!(f, "後手 持駒: {}", pool(Side::Gote))?;
        writeln!(f, "  9  8  7  6  5  4  3  2  1")?;
        for row in 1..=BOARD_SIDE {
            for col in (1..=BOARD_SIDE).rev() {
                match self.get_koma(Coordinate::new(col, row)) {
                    Some(koma) if koma.is_gote() => write!(f, " v{}", koma.character())?,
                    Some(koma) => write!(f, "  {}", koma.character())?,
                    None => write!(f, "  ・")?,
                }
            }
            writeln!(f, " {}", row)?;
        }
        write!(f, "先手 持駒: {}", pool(Side::Sente))
    }
}

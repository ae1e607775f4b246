//! 기물(駒) 정의: 종류별 행마 테이블, 진영, 승격 상태, 식별자

/// 보드 한 변의 칸 수
pub const BOARD_SIDE: i32 = 9;

pub type KomaId = u32;

/// 진영 (선수 = 先手, 후수 = 後手)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Sente,
    Gote,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Sente => Side::Gote,
            Side::Gote => Side::Sente,
        }
    }

    pub fn is_sente(self) -> bool {
        self == Side::Sente
    }
}

/// 한 방향의 행마.
///
/// `(col, row)` 단위 벡터를 1칸부터 `reach`칸까지 순서대로 늘어놓은 것과 같다.
/// 선수 기준이며 row가 음수인 쪽이 전진 방향이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ray {
    pub col: i32,
    pub row: i32,
    pub reach: i32,
}

impl Ray {
    /// 1칸짜리 행마
    pub const fn step(col: i32, row: i32) -> Self {
        Self { col, row, reach: 1 }
    }

    /// 보드 끝까지 미끄러지는 행마
    pub const fn slide(col: i32, row: i32) -> Self {
        Self { col, row, reach: BOARD_SIDE - 1 }
    }

    /// 보드 중심 기준 점대칭 (후수용)
    pub fn flipped(self) -> Self {
        Self { col: -self.col, row: -self.row, reach: self.reach }
    }

    /// 가까운 칸부터 먼 칸 순서의 오프셋
    pub fn offsets(self) -> impl Iterator<Item = (i32, i32)> {
        (1..=self.reach).map(move |d| (self.col * d, self.row * d))
    }
}

const KIN_RAYS: [Ray; 6] = [
    Ray::step(0, -1),
    Ray::step(-1, -1),
    Ray::step(1, -1),
    Ray::step(-1, 0),
    Ray::step(1, 0),
    Ray::step(0, 1),
];

const FU_RAYS: [Ray; 1] = [Ray::step(0, -1)];

const KYOSHA_RAYS: [Ray; 1] = [Ray::slide(0, -1)];

const KEMA_RAYS: [Ray; 2] = [Ray::step(-1, -2), Ray::step(1, -2)];

const GIN_RAYS: [Ray; 5] = [
    Ray::step(0, -1),
    Ray::step(-1, -1),
    Ray::step(1, -1),
    Ray::step(-1, 1),
    Ray::step(1, 1),
];

const KAKU_RAYS: [Ray; 4] = [
    Ray::slide(-1, -1),
    Ray::slide(1, -1),
    Ray::slide(-1, 1),
    Ray::slide(1, 1),
];

// 馬: 대각 슬라이드 + 직교 1칸
const UMA_RAYS: [Ray; 8] = [
    Ray::slide(-1, -1),
    Ray::slide(1, -1),
    Ray::slide(-1, 1),
    Ray::slide(1, 1),
    Ray::step(0, -1),
    Ray::step(1, 0),
    Ray::step(0, 1),
    Ray::step(-1, 0),
];

const HISHA_RAYS: [Ray; 4] = [
    Ray::slide(0, -1),
    Ray::slide(1, 0),
    Ray::slide(0, 1),
    Ray::slide(-1, 0),
];

// 竜: 직교 슬라이드 + 대각 1칸
const RYU_RAYS: [Ray; 8] = [
    Ray::slide(0, -1),
    Ray::slide(1, 0),
    Ray::slide(0, 1),
    Ray::slide(-1, 0),
    Ray::step(-1, -1),
    Ray::step(1, -1),
    Ray::step(1, 1),
    Ray::step(-1, 1),
];

const GYOKU_RAYS: [Ray; 8] = [
    Ray::step(0, -1),
    Ray::step(1, -1),
    Ray::step(1, 0),
    Ray::step(1, 1),
    Ray::step(0, 1),
    Ray::step(-1, 1),
    Ray::step(-1, 0),
    Ray::step(-1, -1),
];

/// 기물 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KomaKind {
    /// 금장 (General)
    Kin,
    /// 보병 (Pawn)
    Fu,
    /// 향차 (Lance)
    Kyosha,
    /// 계마 (Knight)
    Kema,
    /// 은장 (Silver)
    Gin,
    /// 각행 (Bishop)
    Kaku,
    /// 비차 (Rook)
    Hisha,
    /// 옥장 (King)
    Gyoku,
}

impl KomaKind {
    /// 승격 전 행마 (선수 기준)
    pub fn movements(self) -> &'static [Ray] {
        match self {
            KomaKind::Kin => &KIN_RAYS,
            KomaKind::Fu => &FU_RAYS,
            KomaKind::Kyosha => &KYOSHA_RAYS,
            KomaKind::Kema => &KEMA_RAYS,
            KomaKind::Gin => &GIN_RAYS,
            KomaKind::Kaku => &KAKU_RAYS,
            KomaKind::Hisha => &HISHA_RAYS,
            KomaKind::Gyoku => &GYOKU_RAYS,
        }
    }

    /// 승격 후 행마 (선수 기준). 승격할 수 없는 기물은 빈 테이블
    pub fn nari_movements(self) -> &'static [Ray] {
        match self {
            KomaKind::Fu | KomaKind::Kyosha | KomaKind::Kema | KomaKind::Gin => &KIN_RAYS,
            KomaKind::Kaku => &UMA_RAYS,
            KomaKind::Hisha => &RYU_RAYS,
            KomaKind::Kin | KomaKind::Gyoku => &[],
        }
    }

    /// 승격 가능 여부
    pub fn can_promote(self) -> bool {
        !self.nari_movements().is_empty()
    }

    /// 표시용 글자. 승격 가능한 기물은 [승격 전, 승격 후]
    pub fn characters(self) -> &'static [&'static str] {
        match self {
            KomaKind::Kin => &["金"],
            KomaKind::Fu => &["歩", "と"],
            KomaKind::Kyosha => &["香", "杏"],
            KomaKind::Kema => &["桂", "圭"],
            KomaKind::Gin => &["銀", "全"],
            KomaKind::Kaku => &["角", "馬"],
            KomaKind::Hisha => &["飛", "竜"],
            KomaKind::Gyoku => &["玉"],
        }
    }
}

/// 기물
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Koma {
    id: KomaId,
    kind: KomaKind,
    side: Side,
    nari: bool,
}

impl Koma {
    pub fn new(id: KomaId, kind: KomaKind, side: Side) -> Self {
        Self { id, kind, side, nari: false }
    }

    pub fn id(&self) -> KomaId {
        self.id
    }

    pub fn kind(&self) -> KomaKind {
        self.kind
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_sente(&self) -> bool {
        self.side.is_sente()
    }

    pub fn is_gote(&self) -> bool {
        !self.is_sente()
    }

    pub fn is_nari(&self) -> bool {
        self.nari
    }

    /// 현재 글자 (승격 상태 반영)
    pub fn character(&self) -> &'static str {
        let chars = self.kind.characters();
        if chars.len() == 1 {
            chars[0]
        } else {
            chars[usize::from(self.nari)]
        }
    }

    /// 현재 유효한 행마. 후수 기물은 점대칭으로 뒤집힌다
    pub fn movements(&self) -> Vec<Ray> {
        let table = if self.nari {
            self.kind.nari_movements()
        } else {
            self.kind.movements()
        };
        match self.side {
            Side::Sente => table.to_vec(),
            Side::Gote => table.iter().map(|ray| ray.flipped()).collect(),
        }
    }

    /// 승격. 잡히기 전까지 되돌릴 수 없다.
    ///
    /// 종류를 확인하지 않으므로 금장/옥장도 승격 표시가 켜지며,
    /// 그 경우 빈 행마 테이블을 쓰게 된다.
    pub fn naru(&mut self) {
        self.nari = true;
    }

    /// 잡힘: 진영이 바뀌고 승격이 풀린다
    pub fn taken(&mut self) {
        self.side = self.side.opposite();
        self.nari = false;
    }
}

/// 기물 id 발급기. 초기 배치를 만드는 쪽이 소유한다
#[derive(Debug, Clone, Default)]
pub struct KomaIdAllocator {
    next: KomaId,
}

impl KomaIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> KomaId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// 새 id로 기물 생성
    pub fn create(&mut self, kind: KomaKind, side: Side) -> Koma {
        Koma::new(self.allocate(), kind, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets_of(rays: &[Ray]) -> Vec<Vec<(i32, i32)>> {
        rays.iter().map(|r| r.offsets().collect()).collect()
    }

    #[test]
    fn test_slide_reaches_board_edge() {
        let ray = Ray::slide(0, -1);
        let offsets: Vec<_> = ray.offsets().collect();
        assert_eq!(offsets.len(), 8);
        assert_eq!(offsets[0], (0, -1));
        assert_eq!(offsets[7], (0, -8));
    }

    #[test]
    fn test_gote_movements_are_mirrored() {
        let mut alloc = KomaIdAllocator::new();
        let sente = alloc.create(KomaKind::Kema, Side::Sente);
        let gote = alloc.create(KomaKind::Kema, Side::Gote);

        assert_eq!(offsets_of(&sente.movements()), vec![vec![(-1, -2)], vec![(1, -2)]]);
        assert_eq!(offsets_of(&gote.movements()), vec![vec![(1, 2)], vec![(-1, 2)]]);
    }

    #[test]
    fn test_promoted_small_pieces_move_like_kin() {
        for kind in [KomaKind::Fu, KomaKind::Kyosha, KomaKind::Kema, KomaKind::Gin] {
            let mut koma = Koma::new(0, kind, Side::Sente);
            koma.naru();
            assert_eq!(koma.movements(), KomaKind::Kin.movements().to_vec(), "{:?}", kind);
        }
    }

    #[test]
    fn test_uma_and_ryu_extend_base_rays() {
        let mut kaku = Koma::new(0, KomaKind::Kaku, Side::Sente);
        kaku.naru();
        let rays = kaku.movements();
        assert_eq!(rays.len(), 8);
        assert_eq!(&rays[..4], KomaKind::Kaku.movements());
        assert!(rays[4..].iter().all(|r| r.reach == 1 && (r.col == 0 || r.row == 0)));

        let mut hisha = Koma::new(1, KomaKind::Hisha, Side::Sente);
        hisha.naru();
        let rays = hisha.movements();
        assert_eq!(&rays[..4], KomaKind::Hisha.movements());
        assert!(rays[4..].iter().all(|r| r.reach == 1 && r.col != 0 && r.row != 0));
    }

    #[test]
    fn test_can_promote() {
        assert!(!KomaKind::Kin.can_promote());
        assert!(!KomaKind::Gyoku.can_promote());
        for kind in [
            KomaKind::Fu,
            KomaKind::Kyosha,
            KomaKind::Kema,
            KomaKind::Gin,
            KomaKind::Kaku,
            KomaKind::Hisha,
        ] {
            assert!(kind.can_promote());
        }
    }

    #[test]
    fn test_taken_flips_side_and_clears_nari() {
        let mut hisha = Koma::new(7, KomaKind::Hisha, Side::Gote);
        hisha.naru();
        assert_eq!(hisha.character(), "竜");

        hisha.taken();
        assert!(hisha.is_sente());
        assert!(!hisha.is_nari());
        assert_eq!(hisha.character(), "飛");
        assert_eq!(hisha.id(), 7);
    }

    #[test]
    fn test_kin_nari_leaves_no_movements() {
        let mut kin = Koma::new(0, KomaKind::Kin, Side::Sente);
        assert_eq!(kin.character(), "金");
        kin.naru();
        assert!(kin.is_nari());
        assert!(kin.movements().is_empty());
        assert_eq!(kin.character(), "金");
    }

    #[test]
    fn test_allocator_is_sequential() {
        let mut alloc = KomaIdAllocator::new();
        assert_eq!(alloc.allocate(), 0);
        assert_eq!(alloc.allocate(), 1);
        assert_eq!(alloc.create(KomaKind::Fu, Side::Sente).id(), 2);

        // 발급기마다 독립
        let mut other = KomaIdAllocator::new();
        assert_eq!(other.allocate(), 0);
    }
}

use wasm_bindgen::prelude::*;
use serde::{Serialize, Deserialize};
use engine::{Coordinate, Game, Koma, KomaKind, BOARD_SIDE};

/// JS에서 사용할 게임 래퍼
#[wasm_bindgen]
pub struct ShogiGame {
    state: Game,
}

/// JS로 전달할 기물 정보 (지참 기물은 col/row 없음)
#[derive(Debug, Serialize, Deserialize)]
pub struct JsKoma {
    pub id: u32,
    pub kind: String,
    pub character: String,
    pub is_sente: bool,
    pub is_nari: bool,
    pub can_promote: bool,
    pub col: Option<i32>,
    pub row: Option<i32>,
}

/// JS로 전달할 게임 상태
#[derive(Debug, Serialize, Deserialize)]
pub struct JsGameState {
    pub komas: Vec<JsKoma>,
    pub teme: u32,
    pub is_senteban: bool,
    pub nari_confirm_shown: bool,
    pub holding: Option<u32>,
    pub sente_mochigomas: Vec<JsKoma>,
    pub gote_mochigomas: Vec<JsKoma>,
}

/// JS로 전달할 기키 표 (`[col - 1][row - 1]`)
#[derive(Debug, Serialize, Deserialize)]
pub struct JsKiki {
    pub sente: Vec<Vec<u32>>,
    pub gote: Vec<Vec<u32>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsCoordinate {
    pub col: i32,
    pub row: i32,
}

#[wasm_bindgen]
impl ShogiGame {
    /// 평수 배치로 새 게임 생성
    #[wasm_bindgen(constructor)]
    pub fn new() -> ShogiGame {
        ShogiGame {
            state: Game::new(),
        }
    }

    /// 디버그 모드 설정 (수마다 보드를 콘솔에 출력)
    #[wasm_bindgen]
    pub fn set_debug(&mut self, enabled: bool) {
        self.state.debug_mode = enabled;
        log::set_max_level(if enabled {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });
    }

    /// 기물 클릭 (보드 위 기물, 지참 기물 모두)
    #[wasm_bindgen]
    pub fn on_koma_clicked(&mut self, id: u32) {
        self.state.on_piece_selected(id);
    }

    /// 빈 칸 클릭
    #[wasm_bindgen]
    pub fn on_masu_clicked(&mut self, col: i32, row: i32) {
        self.state.on_square_selected(Coordinate::new(col, row));
    }

    /// 승격 다이얼로그 응답. 대기 중이 아니면 예외를 던진다
    #[wasm_bindgen]
    pub fn on_nari_confirm_clicked(&mut self, naru: bool) -> Result<(), JsError> {
        self.state.on_promotion_answered(naru)?;
        Ok(())
    }

    /// 현재 게임 상태
    #[wasm_bindgen]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&build_js_state(&self.state))?)
    }

    /// 양 진영 기키
    #[wasm_bindgen]
    pub fn get_kiki(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&build_js_kiki(&self.state))?)
    }

    /// 특정 칸의 기물이 닿는 칸 목록 (하이라이트용)
    #[wasm_bindgen]
    pub fn get_reachable(&self, col: i32, row: i32) -> Result<JsValue, JsValue> {
        let reachable: Vec<JsCoordinate> = self
            .state
            .board()
            .calc_kiki_for_single_koma(Coordinate::new(col, row))
            .into_iter()
            .map(|c| JsCoordinate { col: c.col, row: c.row })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&reachable)?)
    }

    #[wasm_bindgen]
    pub fn teme(&self) -> u32 {
        self.state.teme()
    }

    #[wasm_bindgen]
    pub fn is_senteban(&self) -> bool {
        self.state.is_senteban()
    }

    #[wasm_bindgen]
    pub fn is_nari_confirm_shown(&self) -> bool {
        self.state.is_nari_confirm_shown()
    }

    /// 텍스트 보드 (디버깅용)
    #[wasm_bindgen]
    pub fn board_text(&self) -> String {
        self.state.board().to_string()
    }
}

impl Default for ShogiGame {
    fn default() -> Self {
        Self::new()
    }
}

// === Private helpers ===

fn kind_to_string(kind: KomaKind) -> &'static str {
    match kind {
        KomaKind::Kin => "kin",
        KomaKind::Fu => "fu",
        KomaKind::Kyosha => "kyosha",
        KomaKind::Kema => "kema",
        KomaKind::Gin => "gin",
        KomaKind::Kaku => "kaku",
        KomaKind::Hisha => "hisha",
        KomaKind::Gyoku => "gyoku",
    }
}

fn to_js_koma(koma: &Koma, coord: Option<Coordinate>) -> JsKoma {
    JsKoma {
        id: koma.id(),
        kind: kind_to_string(koma.kind()).to_string(),
        character: koma.character().to_string(),
        is_sente: koma.is_sente(),
        is_nari: koma.is_nari(),
        can_promote: koma.kind().can_promote(),
        col: coord.map(|c| c.col),
        row: coord.map(|c| c.row),
    }
}

fn build_js_state(game: &Game) -> JsGameState {
    let board = game.board();
    let komas = board
        .komas_on_board()
        .into_iter()
        .map(|(coord, koma)| to_js_koma(koma, Some(coord)))
        .collect();
    let pool = |komas: Vec<&Koma>| -> Vec<JsKoma> {
        komas.into_iter().map(|koma| to_js_koma(koma, None)).collect()
    };

    JsGameState {
        komas,
        teme: game.teme(),
        is_senteban: game.is_senteban(),
        nari_confirm_shown: game.is_nari_confirm_shown(),
        holding: game.holding_koma().map(|koma| koma.id()),
        sente_mochigomas: pool(game.sente_mochigomas()),
        gote_mochigomas: pool(game.gote_mochigomas()),
    }
}

fn build_js_kiki(game: &Game) -> JsKiki {
    let kiki = game.calc_kiki();
    const SIDE: usize = BOARD_SIDE as usize;
    let to_rows = |grid: &[[u32; SIDE]; SIDE]| -> Vec<Vec<u32>> {
        grid.iter().map(|col| col.to_vec()).collect()
    };
    JsKiki {
        sente: to_rows(kiki.sente.as_grid()),
        gote: to_rows(kiki.gote.as_grid()),
    }
}

/// 브라우저 콘솔로 보내는 로거
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

#[wasm_bindgen(start)]
pub fn main() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
    log::info!("Shogi WASM initialized!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_js_state() {
        let game = Game::new();
        let state = build_js_state(&game);

        assert_eq!(state.komas.len(), 40);
        assert_eq!(state.teme, 1);
        assert!(state.is_senteban);
        assert!(!state.nari_confirm_shown);
        assert_eq!(state.holding, None);
        assert!(state.sente_mochigomas.is_empty());

        let gyoku = state.komas.iter().find(|k| k.col == Some(5) && k.row == Some(9)).unwrap();
        assert_eq!(gyoku.kind, "gyoku");
        assert_eq!(gyoku.character, "玉");
        assert!(gyoku.is_sente);
        assert!(!gyoku.can_promote);

        let hisha = state.komas.iter().find(|k| k.col == Some(2) && k.row == Some(8)).unwrap();
        assert!(hisha.can_promote);
    }

    #[test]
    fn test_js_state_after_capture() {
        let mut game = Game::new();
        let c = Coordinate::new;
        let fu = game.get_koma(c(7, 7)).unwrap().id();
        game.on_piece_selected(fu);
        game.on_square_selected(c(7, 6));
        let gote_fu = game.get_koma(c(3, 3)).unwrap().id();
        game.on_piece_selected(gote_fu);
        game.on_square_selected(c(3, 4));
        let kaku = game.get_koma(c(8, 8)).unwrap().id();
        let gote_kaku = game.get_koma(c(2, 2)).unwrap().id();
        game.on_piece_selected(kaku);
        game.on_piece_selected(gote_kaku);

        let state = build_js_state(&game);
        assert!(state.nari_confirm_shown);
        assert_eq!(state.holding, Some(kaku));
        assert_eq!(state.komas.len(), 39);
        assert_eq!(state.sente_mochigomas.len(), 1);
        assert_eq!(state.sente_mochigomas[0].id, gote_kaku);
        assert_eq!(state.sente_mochigomas[0].col, None);
    }

    #[test]
    fn test_js_kiki_layout() {
        let game = Game::new();
        let kiki = build_js_kiki(&game);
        assert_eq!(kiki.sente.len(), 9);
        assert_eq!(kiki.sente[6][5], 1); // 7六
        assert_eq!(kiki.gote[2][3], 1); // 3四
        assert_eq!(kiki.sente[4][4], 0); // 5五
    }
}

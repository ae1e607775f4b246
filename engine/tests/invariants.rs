//! 임의의 클릭 순서에 대해 보드/지참 기물/위치 색인이 어긋나지 않는지 확인

use engine::{Board, Coordinate, Game, Location, Phase};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Event {
    Piece(u32),
    Square(i32, i32),
    Answer(bool),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => (0u32..42).prop_map(Event::Piece),
        4 => (0i32..=10, 0i32..=10).prop_map(|(col, row)| Event::Square(col, row)),
        1 => any::<bool>().prop_map(Event::Answer),
    ]
}

fn apply(game: &mut Game, event: &Event) {
    match *event {
        Event::Piece(id) => game.on_piece_selected(id),
        Event::Square(col, row) => game.on_square_selected(Coordinate::new(col, row)),
        Event::Answer(naru) => {
            let holding = game.holding_koma().is_some();
            let result = game.on_promotion_answered(naru);
            assert_eq!(result.is_ok(), holding);
        }
    }
}

fn assert_locations_agree(board: &Board) {
    let mut on_board = 0;
    let mut in_pool = 0;

    for id in 0..40 {
        match board.coordinate_for(id) {
            Some(Location::OnBoard(coord)) => {
                assert!(coord.is_valid());
                assert_eq!(board.get_koma(coord).map(|k| k.id()), Some(id));
                on_board += 1;
            }
            Some(Location::Mochigoma) => {
                let pooled = board
                    .sente_mochigomas()
                    .into_iter()
                    .chain(board.gote_mochigomas())
                    .filter(|k| k.id() == id)
                    .count();
                assert_eq!(pooled, 1);
                in_pool += 1;
            }
            None => panic!("기물 {} 위치 없음", id),
        }
    }

    assert_eq!(board.komas_on_board().len(), on_board);
    assert_eq!(board.sente_mochigomas().len() + board.gote_mochigomas().len(), in_pool);
    assert_eq!(on_board + in_pool, 40);
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// 닿는 칸은 보드 안이고, 그 사이 칸은 모두 비어 있어야 한다
fn assert_kiki_stops_at_first_koma(board: &Board) {
    for (coord, _) in board.komas_on_board() {
        for target in board.calc_kiki_for_single_koma(coord) {
            assert!(target.is_valid());

            let (dc, dr) = (target.col - coord.col, target.row - coord.row);
            let steps = gcd(dc.abs(), dr.abs());
            for k in 1..steps {
                let between = coord.offset(dc / steps * k, dr / steps * k);
                assert!(
                    board.get_koma(between).is_none(),
                    "{} -> {} 사이 {}",
                    coord,
                    target,
                    between
                );
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn locations_agree_after_any_events(events in prop::collection::vec(event(), 0..200)) {
        let mut game = Game::new();
        for event in &events {
            let teme_before = game.teme();
            apply(&mut game, event);

            prop_assert!(game.teme() == teme_before || game.teme() == teme_before + 1);
            if game.teme() != teme_before {
                prop_assert_eq!(game.phase(), Phase::Idle);
            }
            if game.is_nari_confirm_shown() {
                prop_assert!(game.holding_koma().is_some());
            }
            assert_locations_agree(game.board());
        }
        assert_kiki_stops_at_first_koma(game.board());
    }
}

#[test]
fn test_opening_sequence_keeps_locations() {
    let mut game = Game::new();
    let c = Coordinate::new;

    // ▲7六歩 △3四歩 ▲2二角成(角交換)
    let sente_fu = game.get_koma(c(7, 7)).unwrap().id();
    game.on_piece_selected(sente_fu);
    game.on_square_selected(c(7, 6));

    let gote_fu = game.get_koma(c(3, 3)).unwrap().id();
    game.on_piece_selected(gote_fu);
    game.on_square_selected(c(3, 4));

    let sente_kaku = game.get_koma(c(8, 8)).unwrap().id();
    let gote_kaku = game.get_koma(c(2, 2)).unwrap().id();
    game.on_piece_selected(sente_kaku);
    game.on_piece_selected(gote_kaku);
    assert!(game.is_nari_confirm_shown());
    game.on_promotion_answered(true).unwrap();

    assert_eq!(game.teme(), 4);
    assert_eq!(game.get_koma(c(2, 2)).unwrap().character(), "馬");
    assert_eq!(game.sente_mochigomas().len(), 1);
    assert_eq!(game.sente_mochigomas()[0].character(), "角");
    assert_locations_agree(game.board());

    // △同銀
    let gote_gin = game.get_koma(c(3, 1)).unwrap().id();
    game.on_piece_selected(gote_gin);
    game.on_piece_selected(sente_kaku);
    assert_eq!(game.teme(), 5);
    assert_eq!(game.gote_mochigomas().len(), 1);
    assert!(!game.gote_mochigomas()[0].is_nari());
    assert_locations_agree(game.board());
}

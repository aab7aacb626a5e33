use std::time::Duration;

use blockfall_engine::{
    Cell, Direction, FIELD_HEIGHT, FallingPiece, Field, Game, GameConfig, ManualClock, PieceKind,
    PieceSequence, Position, Session, Transition,
};

fn game(kinds: &[PieceKind]) -> (Game<PieceSequence, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let game = Game::new(
        &GameConfig::default(),
        PieceSequence::new(kinds.iter().copied()),
        clock.clone(),
    )
    .unwrap();
    (game, clock)
}

fn shift(game: &mut Game<PieceSequence, ManualClock>, dx: i32) {
    let direction = if dx < 0 { Direction::Left } else { Direction::Right };
    for _ in 0..dx.abs() {
        assert_eq!(game.move_piece(direction), Transition::Moved);
    }
}

/// Lets gravity take the active piece down until it locks.
fn settle(game: &mut Game<PieceSequence, ManualClock>, clock: &ManualClock) -> Transition {
    loop {
        clock.advance(Duration::from_millis(501));
        let transition = game.poll();
        if transition.is_locked() {
            return transition;
        }
        assert_eq!(transition, Transition::Moved);
    }
}

#[test]
fn two_bars_and_a_square_clear_the_bottom_line() {
    let (mut game, clock) = game(&[PieceKind::I, PieceKind::I, PieceKind::O]);
    game.start();

    // I spawns with its box at x = 3; flush it left, covering columns 0-3.
    shift(&mut game, -3);
    settle(&mut game, &clock);
    // Second I covers columns 4-7.
    shift(&mut game, 1);
    settle(&mut game, &clock);
    // O spawns at x = 4; push it to columns 8-9.
    shift(&mut game, 4);
    let Transition::Locked(event) = settle(&mut game, &clock) else {
        unreachable!();
    };

    assert_eq!(event.cleared_rows.as_slice(), &[FIELD_HEIGHT - 1]);
    assert_eq!(event.score_gained, 40);
    assert!(!event.topped_out);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.score(), 40);
    assert_eq!(snapshot.total_cleared_lines(), 1);
    assert_eq!(snapshot.level(), 1);
    assert_eq!(snapshot.stats().completed_pieces(), 3);
    assert_eq!(snapshot.board().rows().len(), FIELD_HEIGHT);

    let expected: Field = "
        ........OO
    "
    .parse()
    .unwrap();
    assert_eq!(game.session().field(), &expected);
}

#[test]
fn vertical_bar_kicks_off_left_wall() {
    let mut session = Session::new(PieceSequence::new([PieceKind::I]));
    session.start();
    assert_eq!(session.try_rotate(), Transition::Moved);
    for _ in 0..4 {
        assert_eq!(session.try_move(Direction::Left), Transition::Moved);
    }
    assert_eq!(session.try_move(Direction::Left), Transition::Rejected);
    assert_eq!(
        session.falling_piece(),
        Some(&FallingPiece::new(PieceKind::I, Position::new(-1, 0), 1))
    );

    assert_eq!(session.try_rotate(), Transition::Moved);
    let piece = session.falling_piece().unwrap();
    assert_eq!(piece.rotation(), 2);
    assert_eq!(piece.position(), Position::new(0, 0));
    let cells: Vec<_> = piece.occupied_positions().collect();
    assert_eq!(cells, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
}

#[test]
fn stacking_in_the_spawn_columns_tops_out() {
    let (mut game, clock) = game(&[PieceKind::O, PieceKind::T]);
    game.start();

    let mut locks = 0;
    while !game.snapshot().is_game_over() {
        if let Transition::Locked(event) = settle(&mut game, &clock) {
            locks += 1;
            if event.topped_out {
                break;
            }
        }
    }
    assert!(game.snapshot().is_game_over());
    assert!(game.snapshot().is_paused());
    assert!(game.session().falling_piece().is_none());
    assert!(locks < 20);

    // The rejected piece stays queued; nothing moves any more.
    let next = game.snapshot().next_piece();
    assert!(next.is_some());
    clock.advance(Duration::from_secs(10));
    assert_eq!(game.poll(), Transition::Ignored);
    assert_eq!(game.move_piece(Direction::Down), Transition::Ignored);
    assert_eq!(game.snapshot().next_piece(), next);

    // Every spawn column in the top row is blocked by the stack.
    let top = game.session().field().rows()[0];
    assert!(top[4] != Cell::Empty || top[5] != Cell::Empty);

    game.start();
    assert!(game.snapshot().state().is_running());
    assert!(game.session().field().is_empty());
}

#[test]
fn four_lines_at_once_score_a_quad() {
    let mut field_text = String::new();
    for _ in 0..4 {
        field_text.push_str("#########.\n");
    }
    let field: Field = field_text.parse().unwrap();
    assert_eq!(field.full_rows().len(), 0);

    let bar = FallingPiece::new(PieceKind::I, Position::new(8, 16), 1);
    assert!(!field.is_colliding(&bar));
    assert!(field.is_colliding(&bar.moved(Direction::Down)));

    let (cleared, lines) = field.merged(&bar).cleared();
    assert_eq!(lines, 4);
    assert!(cleared.is_empty());
}

#[test]
fn ten_lines_reach_level_two_and_speed_up() {
    // Fill the bottom row with two bars and a square, repeatedly.
    let (mut game, clock) = game(&[PieceKind::I, PieceKind::I, PieceKind::O]);
    game.start();
    let first_interval = game.poll_interval();

    for round in 0..10 {
        assert_eq!(game.snapshot().level(), 1, "round {round}");
        shift(&mut game, -3);
        settle(&mut game, &clock);
        shift(&mut game, 1);
        settle(&mut game, &clock);
        // Leftover square halves pile up in columns 8-9, so from the second
        // round on the second bar completes the row and the square only adds
        // to the pile.
        shift(&mut game, 4);
        settle(&mut game, &clock);
        assert_eq!(game.snapshot().total_cleared_lines(), round + 1);
    }

    let snapshot = game.snapshot();
    assert_eq!(snapshot.level(), 2);
    assert_eq!(snapshot.total_cleared_lines(), 10);
    assert_eq!(snapshot.score(), 40 * 10);
    assert!(game.poll_interval() < first_interval);
}

#[test]
fn five_squares_across_the_floor_clear_two_lines() {
    let (mut game, clock) = game(&[PieceKind::O]);
    game.start();

    for dx in [-4, -2, 0, 2, 4] {
        shift(&mut game, dx);
        settle(&mut game, &clock);
    }

    let snapshot = game.snapshot();
    assert_eq!(snapshot.total_cleared_lines(), 2);
    assert_eq!(snapshot.score(), 100);
    assert_eq!(snapshot.stats().line_cleared_counter()[2], 1);
    assert!(game.session().field().is_empty());
    assert_eq!(game.session().field().rows().len(), FIELD_HEIGHT);
}

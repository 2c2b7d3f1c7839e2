//! Integration tests for command sessions and saved scripts.

mod common;

use common::{attempt, parse_step, FakeLibrary};
use fmc_attempt::core::{Face, StepKind};
use fmc_attempt::session::{Command, Session, SessionError};
use tempfile::tempdir;

fn session(lib: &std::sync::Arc<FakeLibrary>) -> Session {
    Session::new(attempt(lib, "R U2 F"))
}

#[test]
fn moves_and_steps_from_text() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("r u").unwrap();
    s.execute("niss").unwrap();
    s.execute("D'").unwrap();
    assert_eq!(s.attempt().solution().alg().to_string(), "R U (D')");
    assert_eq!(s.history().len(), 4);
}

#[test]
fn reopens_previous_step_for_moves_it_allows() {
    let lib = FakeLibrary::new();
    lib.forbid("eofb", &[Face::F]);
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("R").unwrap();
    s.execute("drud").unwrap();

    s.execute("F").unwrap();
    let live = s.attempt().solution();
    assert_eq!(live.step(), parse_step("eofb"));
    assert_eq!(live.alg().to_string(), "R F");
}

#[test]
fn rejected_moves_leave_everything_alone() {
    let lib = FakeLibrary::new();
    lib.forbid("eofb", &[Face::F]);
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("R").unwrap();
    s.execute("drud").unwrap();
    s.execute("U").unwrap();

    assert!(matches!(s.execute("F"), Err(SessionError::Rejected(_))));
    assert_eq!(s.attempt().solution().alg().to_string(), "U");
    assert_eq!(s.history().len(), 4);
}

#[test]
fn htr_takes_axis_from_solved_dr() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("R").unwrap();
    s.execute("drrl").unwrap();
    s.execute("U").unwrap();
    assert!(matches!(s.execute("htr"), Err(SessionError::Rejected(_))));

    lib.mark_solved("drrl");
    s.execute("htr").unwrap();
    assert_eq!(s.attempt().solution().step(), parse_step("htrrl"));

    s.execute("F2").unwrap();
    s.execute("slice").unwrap();
    assert_eq!(s.attempt().solution().step(), parse_step("slicerl"));
}

#[test]
fn solve_saves_and_selects_last() {
    let lib = FakeLibrary::new();
    lib.set_solutions("eofb", &["R", "F' U"]);
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("solve(2)").unwrap();

    assert_eq!(s.status(), "Found 2 solutions");
    assert_eq!(s.attempt().solutions_by_kind()[&StepKind::Eo].len(), 2);
    let live = s.attempt().solution();
    assert_eq!(live.step(), parse_step("drud"));
    assert_eq!(live.full_alg().to_string(), "F' U");
}

#[test]
fn solve_with_no_results_reports_status() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("solve").unwrap();
    assert_eq!(s.status(), "No solutions found for eofb");
}

#[test]
fn check_and_forget_by_index() {
    let lib = FakeLibrary::new();
    lib.set_solutions("eofb", &["R", "F' U"]);
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("solve(2)").unwrap();

    s.execute("check(\"eo\", 1)").unwrap();
    assert_eq!(s.attempt().solution().full_alg().to_string(), "R");

    assert!(s.execute("check(\"eo\", 3)").is_err());
    assert!(s.execute("check(\"dr\", 1)").is_err());

    s.execute("forget(\"eo\", 2)").unwrap();
    assert_eq!(s.attempt().solutions_by_kind()[&StepKind::Eo].len(), 1);
}

#[test]
fn save_without_progress_is_rejected() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    assert!(matches!(s.execute("save"), Err(SessionError::Rejected(_))));
}

#[test]
fn replace_requires_insertions_step() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    assert!(matches!(
        s.execute("replace(\"R\", 1)"),
        Err(SessionError::Insertion(_))
    ));

    s.execute("finish").unwrap();
    s.execute("R U F").unwrap();
    s.execute("insertions").unwrap();
    s.execute("replace(\"R F\", 3)").unwrap();
    assert_eq!(s.attempt().solution().full_alg().to_string(), "R F");
}

#[test]
fn script_round_trip_rebuilds_attempt() {
    let lib = FakeLibrary::new();
    lib.set_solutions("eofb", &["R", "F' U"]);
    let mut s = session(&lib);
    s.execute("scramble(\"R U2 F\")").unwrap();
    s.execute("eofb").unwrap();
    s.execute("solve(2)").unwrap();
    s.execute("comment(\"two moves\")").unwrap();
    s.execute("U2").unwrap();
    s.execute("sort(\"time\", true)").unwrap();

    let script = s.script();
    assert!(script.starts_with("# fmc-attempt session v1\n"));

    let mut replayed = Session::new(fmc_attempt::Attempt::new(lib.clone()));
    replayed.load_script(&script).unwrap();

    assert_eq!(replayed.history(), s.history());
    assert_eq!(replayed.attempt().scramble(), "R U2 F");
    assert_eq!(
        replayed.attempt().solution().full_alg(),
        s.attempt().solution().full_alg()
    );
    let eo = replayed.attempt().solution().previous().unwrap().clone();
    assert_eq!(replayed.attempt().get_comment(&eo), Some("two moves"));
    assert!(replayed.attempt().preferences().group_by_axis);
}

#[test]
fn bad_script_reports_every_line_and_changes_nothing() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("R").unwrap();

    let script = "# header\neofb\nfrobnicate\nR U\nsolve(\n";
    match s.load_script(script) {
        Err(SessionError::Script(errors)) => {
            let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
            assert_eq!(lines, vec![3, 5]);
        }
        other => panic!("expected script errors, got {:?}", other),
    }
    assert_eq!(s.attempt().solution().alg().to_string(), "R");
    assert_eq!(s.history().len(), 2);
}

#[test]
fn session_files() {
    let lib = FakeLibrary::new();
    let dir = tempdir().unwrap();
    let path = dir.path().join("attempt.txt");

    let mut s = session(&lib);
    s.execute("scramble").unwrap();
    s.execute("eofb").unwrap();
    s.execute("L").unwrap();
    s.save_session(&path).unwrap();

    let mut loaded = Session::new(fmc_attempt::Attempt::new(lib.clone()));
    loaded.load_session(&path).unwrap();
    assert_eq!(loaded.attempt().scramble(), "R' U' F D2 B L' R' U' F");
    assert_eq!(loaded.attempt().solution().alg().to_string(), "L");

    let missing = dir.path().join("missing.txt");
    assert!(matches!(loaded.load_session(&missing), Err(SessionError::Io(_))));
}

#[test]
fn undo_reverses_moves_only() {
    let lib = FakeLibrary::new();
    let mut s = session(&lib);
    s.execute("eofb").unwrap();
    s.execute("R U").unwrap();
    s.execute("undo").unwrap();
    assert!(s.attempt().solution().alg().is_empty());
    assert_eq!(s.history().last(), Some(&Command::Moves("U' R'".parse().unwrap())));

    assert!(!s.undo().unwrap());
    assert_eq!(s.attempt().solution().step(), parse_step("eofb"));
}

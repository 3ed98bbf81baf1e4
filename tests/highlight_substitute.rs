use modal_buffer::{BufferError, EditError, Highlight, RenderSpan, Session};

fn spans(s: &Session, row: usize) -> Vec<(Highlight, String)> {
    s.render_spans(row)
        .unwrap()
        .into_iter()
        .map(|RenderSpan { tag, text }| (tag, text))
        .collect()
}

#[test]
fn test_highlight_marks_matches() {
    let mut s = Session::new("foo bar\nboo");
    s.set_highlight("o+").unwrap();
    assert_eq!(
        spans(&s, 0),
        vec![
            (Highlight::Normal, "f".to_string()),
            (Highlight::Match, "oo".to_string()),
            (Highlight::Normal, " bar".to_string()),
        ]
    );
    assert_eq!(
        spans(&s, 1),
        vec![
            (Highlight::Normal, "b".to_string()),
            (Highlight::Match, "oo".to_string()),
        ]
    );

    s.clear_highlight();
    assert_eq!(spans(&s, 0), vec![(Highlight::Normal, "foo bar".to_string())]);
}

#[test]
fn test_invalid_highlight_pattern_is_an_error() {
    let mut s = Session::new("foo");
    s.set_highlight("o").unwrap();
    assert!(matches!(s.set_highlight("(["), Err(EditError::Pattern(_))));
    assert_eq!(
        spans(&s, 0),
        vec![
            (Highlight::Normal, "f".to_string()),
            (Highlight::Match, "oo".to_string()),
        ]
    );
}

#[test]
fn test_selection_wins_over_match() {
    let mut s = Session::new("foo bar");
    s.set_highlight("o").unwrap();
    s.feed("vl");
    assert_eq!(
        spans(&s, 0),
        vec![
            (Highlight::Selection, "f".to_string()),
            (Highlight::Match, "oo".to_string()),
            (Highlight::Normal, " bar".to_string()),
        ]
    );
}

#[test]
fn test_empty_line_span() {
    let s = Session::new("a\n\nb");
    assert_eq!(spans(&s, 1), vec![(Highlight::Normal, String::new())]);
}

#[test]
fn test_render_spans_out_of_range() {
    let s = Session::new("a\nb");
    assert_eq!(
        s.render_spans(9),
        Err(BufferError::CoordinateOutOfRange { row: 9, col: 0 })
    );
}

#[test]
fn test_substitute_replaces_every_match() {
    let mut s = Session::new("cat hat\nbat");
    assert_eq!(s.substitute("at", "og").unwrap(), 3);
    assert_eq!(s.text(), "cog hog\nbog");
    s.feed("u");
    assert_eq!(s.text(), "cat hat\nbat");
}

#[test]
fn test_substitute_with_capture_groups() {
    let mut s = Session::new("key=value\nname=modal");
    assert_eq!(s.substitute(r"(\w+)=(\w+)", "$2:$1").unwrap(), 2);
    assert_eq!(s.text(), "value:key\nmodal:name");
}

#[test]
fn test_substitute_without_matches_changes_nothing() {
    let mut s = Session::new("abc");
    assert_eq!(s.substitute("z", "y").unwrap(), 0);
    assert!(s.editor().undo_stack().is_empty());
    assert!(matches!(s.substitute("(", "y"), Err(EditError::Pattern(_))));
    assert_eq!(s.text(), "abc");
}

#[test]
fn test_substitute_reclamps_cursor() {
    let mut s = Session::new("aaaa\nb");
    s.feed("$");
    assert_eq!(s.cursor().col, 4);
    s.substitute("a+", "x").unwrap();
    assert_eq!(s.text(), "x\nb");
    assert_eq!(s.cursor().col, 1);
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use toastbox::notifier::CONTAINER_CLASS;
use toastbox::{
    ANIMATION_MARGIN, Document, Event, MemoryDocument, Notifier, Position, ToastKind,
    ToastOptions, ToastState, show,
};

#[test]
fn saved_example_appears_then_disappears_with_its_tray() {
    let mut notifier = Notifier::new(MemoryDocument::new(), &ToastOptions::default());
    let toast = notifier
        .notify(
            "Saved",
            &ToastOptions::new()
                .kind(ToastKind::Success)
                .duration(Duration::from_millis(1000))
                .auto_close(true)
                .use_icons(true),
        )
        .unwrap();

    insta::assert_snapshot!(
        notifier.document().to_html(),
        @r#"<div class="toast__container top-right"><div class="toast toast__success"><span class="toast__icon"><i class="fa-solid fa-check"></i></span><span class="toast__message">Saved</span></div></div>"#
    );

    notifier
        .advance(Duration::from_millis(1000) + ANIMATION_MARGIN)
        .unwrap();
    assert_eq!(notifier.state(toast), None);
    assert_eq!(notifier.document().to_html(), "");
}

#[test]
fn fading_toast_renders_with_zero_opacity() {
    let mut notifier = Notifier::new(
        MemoryDocument::new(),
        &ToastOptions::new().close_button(true),
    )
    .with_exit_transition(None);
    let toast = notifier
        .notify(
            "<em>Disk</em> almost full",
            &ToastOptions::new()
                .kind(ToastKind::Error)
                .custom_class("brand")
                .custom_bg_color("#c00"),
        )
        .unwrap();
    let button = notifier.close_button(toast).unwrap();
    notifier.dispatch(button, Event::Click).unwrap();

    assert_eq!(notifier.state(toast), Some(ToastState::Fading));
    insta::assert_snapshot!(
        notifier.document().to_html(),
        @r#"<div class="toast__container top-right"><div class="toast toast__error brand" style="background-color: #c00; opacity: 0"><span class="toast__message" style="margin-right: 20px"><em>Disk</em> almost full</span><span class="toast__close_button"><i class="fa-solid fa-xmark"></i></span></div></div>"#
    );

    notifier.dispatch(toast, Event::TransitionEnd).unwrap();
    assert!(notifier.document().body_children().is_empty());
}

#[test]
fn instance_defaults_apply_to_every_toast() {
    let mut notifier = Notifier::new(
        MemoryDocument::new(),
        &ToastOptions::new()
            .position(Position::BottomCenter)
            .use_icons(true)
            .auto_close(false),
    );
    let first = notifier.notify("one", &ToastOptions::new()).unwrap();
    let second = notifier
        .notify("two", &ToastOptions::new().use_icons(false))
        .unwrap();

    let tray = notifier.tray().unwrap();
    let doc = notifier.document();
    assert!(doc.has_class(tray, "bottom-center"));
    assert_eq!(doc.child_count(first), 2);
    assert_eq!(doc.child_count(second), 1);

    notifier.advance(Duration::from_secs(60)).unwrap();
    assert_eq!(notifier.active_count(), 2);
}

#[test]
fn two_one_shot_calls_build_two_independent_trays() {
    let document = Rc::new(RefCell::new(MemoryDocument::new()));

    let (mut first, first_toast) = show(
        Rc::clone(&document),
        "first",
        &ToastOptions::new().duration(Duration::from_millis(100)),
    )
    .unwrap();
    let (second, second_toast) = show(Rc::clone(&document), "second", &ToastOptions::new()).unwrap();

    {
        let doc = document.borrow();
        let trays = doc.find_by_class(CONTAINER_CLASS);
        assert_eq!(trays.len(), 2);
        assert_eq!(doc.children(trays[0]), &[first_toast]);
        assert_eq!(doc.children(trays[1]), &[second_toast]);
    }

    first
        .advance(Duration::from_millis(100) + ANIMATION_MARGIN)
        .unwrap();
    assert!(first.tray().is_none());
    assert_eq!(document.borrow().body_children().len(), 1);
    assert_eq!(second.state(second_toast), Some(ToastState::Displayed));
}

#[test]
fn hover_pause_survives_the_original_deadline() {
    let mut notifier = Notifier::new(
        MemoryDocument::new(),
        &ToastOptions::new().stop_on_hover(true),
    );
    let toast = notifier.notify("hover", &ToastOptions::new()).unwrap();
    let full = Duration::from_millis(4000) + ANIMATION_MARGIN;

    notifier.advance(Duration::from_millis(10)).unwrap();
    notifier.dispatch(toast, Event::MouseEnter).unwrap();
    notifier.advance(full).unwrap();
    assert_eq!(notifier.state(toast), Some(ToastState::Displayed));

    notifier.dispatch(toast, Event::MouseLeave).unwrap();
    assert_eq!(notifier.next_deadline(), Some(full));
    notifier.advance(full).unwrap();
    assert!(notifier.tray().is_none());
}

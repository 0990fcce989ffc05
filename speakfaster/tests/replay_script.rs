//! Replay scripts run offline: responses come from `respond`/`fill` lines.

use speakfaster::{ClientConfig, InputBarEvent, Mode, Replay};

fn events_of_type<'a>(events: &'a [InputBarEvent], kind: &str) -> Vec<&'a InputBarEvent> {
    events
        .iter()
        .filter(|e| serde_json::to_value(e).unwrap()["type"] == kind)
        .collect()
}

#[test]
fn test_expand_select_and_settle() {
    let script = "\
# double space triggers
context how are you|fine thanks
type hay
key space
key space
respond how are you|hope all's well
select 0
wait 499
";
    let mut replay = Replay::new(Default::default());
    let events = replay.run_script(script).unwrap();

    assert_eq!(events_of_type(&events, "abbreviation_changed").len(), 1);
    assert_eq!(events_of_type(&events, "expansion_requested").len(), 1);
    let ended = events_of_type(&events, "text_entry_ended");
    assert_eq!(ended.len(), 1);
    assert!(matches!(
        ended[0],
        InputBarEvent::TextEntryEnded { entry } if entry.text == "how are you"
    ));
    assert_eq!(replay.bar().view().options.len(), 2);

    replay.run_line(9, "wait 1").unwrap();
    assert!(replay.bar().view().options.is_empty());
}

#[test]
fn test_spelling_script() {
    let script = "\
type abc
key space
key space
spell
type bit
key space
";
    let mut replay = Replay::new(Default::default());
    let events = replay.run_script(script).unwrap();
    let specs: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            InputBarEvent::AbbreviationChanged { spec, .. } => Some(spec),
            _ => None,
        })
        .collect();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[1].readable_string(), "a bit c");
    assert_eq!(specs[1].eraser_sequence().len(), 9);
    assert_eq!(events_of_type(&events, "lexicon_prefix_requested").len(), 1);
}

#[test]
fn test_refinement_script() {
    let script = "\
context how do you feel
type ifg
key enter
respond i feel great
refine 0
click 2
fill great|good|fine
replace 1
speak
";
    let mut replay = Replay::new(Default::default());
    let events = replay.run_script(script).unwrap();
    let fill = events_of_type(&events, "fill_mask_requested");
    assert_eq!(fill.len(), 1);
    assert!(matches!(
        fill[0],
        InputBarEvent::FillMaskRequested { request } if request.phrase_with_mask == "i feel _"
    ));
    assert!(events.iter().any(|e| matches!(
        e,
        InputBarEvent::TextEntryEnded { entry } if entry.text == "i feel fine"
    )));
    assert_eq!(replay.bar().mode(), Mode::EnteringText);
}

#[test]
fn test_failure_is_shown_and_abortable() {
    let script = "\
context hello
type hay
key enter
fail service unavailable
";
    let mut replay = Replay::new(Default::default());
    replay.run_script(script).unwrap();
    let view = replay.bar().view();
    assert_eq!(view.error_message.as_deref(), Some("service unavailable"));
    assert_eq!(view.input_string, "hay\n");

    replay.run_line(5, "abort").unwrap();
    assert_eq!(replay.bar().input_string(), "");
}

#[test]
fn test_respond_without_request_fails_with_line() {
    let mut replay = Replay::new(Default::default());
    let err = replay.run_script("type hay\nrespond x\n").unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn test_config_limits_apply_to_replay() {
    let config = ClientConfig::from_toml_str("max_head_keywords = 1\n").unwrap();
    let mut replay = Replay::new(config.into_base());
    let events = replay.run_script("type a b cd\nkey enter\n").unwrap();
    assert!(events_of_type(&events, "abbreviation_changed").is_empty());
    assert!(replay.bar().view().length_limit_exceeded);
}

use std::sync::{Arc, Mutex};

use iparser::{
    Error, HardsetReplay, Machine, MachineOptions, Pattern, PatternElement,
    ROOT, State, Status,
};

#[test]
fn tag_enters_and_leaves() {
    let mut machine = Machine::new();
    let root = machine.add_state(State::new("root").ignore_all([' ']));
    let tag = machine.add_state(State::new("tag").with_entry("<").with_leave(">"));
    machine.state_mut(root).unwrap().add_branch(tag);
    machine.prestart().unwrap();

    for symbol in "  ".chars() {
        assert!(machine.parse(symbol).unwrap());
        assert_eq!(machine.status(), Status::Wait);
    }
    assert!(machine.parse('<').unwrap());
    assert_eq!(machine.status(), Status::Branch);
    assert_eq!(machine.current_state_name(), Some("tag"));

    assert!(machine.parse('>').unwrap());
    assert_eq!(machine.status(), Status::Back);
    assert_eq!(machine.current_state_name(), Some("root"));
}

#[test]
fn sibling_entries_disambiguate() {
    let missed = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&missed);

    let mut machine = Machine::new();
    machine.add_state(State::new("root").with_branches([1, 2]).on_miss(
        move |symbol| {
            sink.lock().unwrap().push(symbol);
            Ok(None)
        },
    ));
    machine.add_state(State::new("one").with_entry("xy"));
    machine.add_state(State::new("two").with_entry("xz"));

    machine.prestart().unwrap();
    machine.parse('x').unwrap();
    assert_eq!(machine.status(), Status::Wait);
    machine.parse('y').unwrap();
    assert_eq!(machine.current_state_name(), Some("one"));

    machine.prestart().unwrap();
    machine.parse_str("xz").unwrap();
    assert_eq!(machine.current_state_name(), Some("two"));

    machine.prestart().unwrap();
    machine.parse_str("xw").unwrap();
    assert_eq!(machine.status(), Status::Miss);
    assert_eq!(machine.current_state_name(), Some("root"));
    assert_eq!(*missed.lock().unwrap(), "xw");
}

#[test]
fn repeated_symbol_still_completes() {
    let mut machine = Machine::new();
    machine.add_state(State::new("root").with_branch(1));
    machine.add_state(State::new("ab").with_entry("ab"));
    machine.prestart().unwrap();

    machine.parse_str("aa").unwrap();
    assert_eq!(machine.progress(1), Some((1, 0)));
    machine.parse('b').unwrap();
    assert_eq!(machine.status(), Status::Branch);
}

#[test]
fn tokenizes_numbers_and_words() {
    let tokens = Arc::new(Mutex::new(Vec::<String>::new()));
    let word = Arc::new(Mutex::new(String::new()));

    let digit = PatternElement::regex("[0-9]").unwrap();
    let non_digit = PatternElement::regex("[^0-9]").unwrap();

    let on_number = Arc::clone(&tokens);
    let on_word = Arc::clone(&word);
    let flush_word = Arc::clone(&word);
    let word_tokens = Arc::clone(&tokens);

    let mut machine = Machine::new();
    machine.add_state(
        State::new("root")
            .with_branch(1)
            .ignore_in_handler([' '])
            .on_miss(move |symbol| {
                on_word.lock().unwrap().push(symbol);
                Ok(None)
            }),
    );
    machine.add_state(
        State::new("number")
            .with_entry(Pattern::new([digit]))
            .with_leave(Pattern::new([non_digit]))
            .on_enter(move |buffer| {
                let word = std::mem::take(&mut *flush_word.lock().unwrap());
                if !word.is_empty() {
                    word_tokens.lock().unwrap().push(word);
                }
                on_number.lock().unwrap().push(buffer.iter().collect());
                Ok(())
            })
            .on_miss(|_| Ok(None)),
    );
    machine.prestart().unwrap();

    assert!(machine.parse_str("ab 7;cd 9 ").unwrap());
    assert_eq!(*tokens.lock().unwrap(), ["ab", "7", "cd", "9"]);
}

#[test]
fn hardset_policy_is_configurable() {
    let run = |hardset_replay| {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root_seen = Arc::clone(&seen);
        let alert_seen = Arc::clone(&seen);

        let mut machine = Machine::with_options(MachineOptions {
            hardset_replay,
            ..MachineOptions::default()
        });
        machine.add_state(State::new("root").with_branch(2).on_miss(
            move |symbol| {
                root_seen.lock().unwrap().push(("root", symbol));
                Ok((symbol == 'a').then_some(1))
            },
        ));
        machine.add_state(State::new("alert").on_miss(move |symbol| {
            alert_seen.lock().unwrap().push(("alert", symbol));
            Ok(None)
        }));
        machine.add_state(State::new("ab").with_entry("ab"));
        machine.prestart().unwrap();

        machine.parse_str("ax").unwrap();
        assert_eq!(machine.status(), Status::Hardset);
        assert_eq!(machine.chain(), &[ROOT, 1]);
        let seen = seen.lock().unwrap().clone();
        seen
    };

    assert_eq!(run(HardsetReplay::Stop), [("root", 'a')]);
    assert_eq!(
        run(HardsetReplay::Continue),
        [("root", 'a'), ("alert", 'x')]
    );
}

#[test]
fn invalid_handler_index_aborts_parse() {
    let mut machine = Machine::new();
    machine.add_state(State::new("root").on_miss(|_| Ok(Some(1))));
    machine.prestart().unwrap();

    let err = machine.parse('x').unwrap_err();
    assert!(matches!(err, Error::InvalidStateIndex { index: 1, len: 1, .. }));
    assert_eq!(
        err.to_string(),
        "miss handler of <root> returned state index 1, machine has 1 states"
    );
}

use std::sync::{Arc, Mutex};

use iparser::{Machine, State};

/// Collects the names of the tags found in a markup snippet.
fn main() -> iparser::Result<()> {
    let names = Arc::new(Mutex::new(Vec::<String>::new()));
    let current = Arc::new(Mutex::new(String::new()));

    let collect = Arc::clone(&current);
    let finish = Arc::clone(&current);
    let sink = Arc::clone(&names);

    let mut machine = Machine::new();
    let root = machine.add_state(State::new("root").ignore_all(['\n']));
    let tag = machine.add_state(
        State::new("tag")
            .with_entry("<")
            .with_leave(">")
            .ignore_in_handler(['/'])
            .on_miss(move |symbol| {
                collect.lock().unwrap().push(symbol);
                Ok(None)
            })
            .on_leave(move |_| {
                let name = std::mem::take(&mut *finish.lock().unwrap());
                sink.lock().unwrap().push(name);
                Ok(())
            }),
    );
    if let Some(state) = machine.state_mut(root) {
        state.add_branch(tag);
    }

    print!("{}", machine.dump());

    machine.prestart()?;
    machine.parse_str("<html>\n<body>text</body>\n</html>")?;

    println!("tags: {:?}", names.lock().unwrap());
    Ok(())
}

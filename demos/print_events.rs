//! Print the events of a document read from stdin, e.g.
//! printf '<h1 xmlns="urn:x">Hello world!</h1>' | cargo run --example=print_events
use std::io::BufRead;

use saxgum::PullParser;

fn main() {
    let lines = std::io::stdin()
        .lock()
        .lines()
        .map_while(Result::ok)
        .map(|line| line + "\n");

    for event in PullParser::from_chunks(lines) {
        println!("{:?}", event);
    }
}

use std::cell::Cell;

use ringcache::memo::Memoized;

fn main() {
    let calls = Cell::new(0u32);
    let mut slow_double = Memoized::new(8, |n: &u64| {
        calls.set(calls.get() + 1);
        n * 2
    });

    println!("double(21) = {}", slow_double.call(21));
    println!("double(21) = {}", slow_double.call(21));
    println!("computed {} time(s)", calls.get());
}

// Expected output:
// double(21) = 42
// double(21) = 42
// computed 1 time(s)

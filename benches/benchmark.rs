use std::fmt::Write;
use std::time::Instant;

use millcode::config::Config;
use millcode::estimate::estimate_program;

fn main() {
    let moves = 200_000;

    println!("Generating program with {} moves...", moves);
    let mut program = String::from("F800\n");
    for i in 0..moves {
        let x = (i % 100) as f64;
        let y = ((i * 7) % 100) as f64;
        match i % 10 {
            0 => writeln!(program, "G00 X{x} Y{y} Z5").unwrap(),
            9 => {
                // Position first so the arc target lies on the implied circle.
                writeln!(program, "G01 X{x} Y{y} Z-1").unwrap();
                writeln!(program, "G02 X{} Y{y} I5 J0", x + 10.0).unwrap();
            }
            _ => writeln!(program, "G01 X{x} Y{y} Z-1").unwrap(),
        }
    }

    let config = Config::default();
    let start = Instant::now();
    let seconds = estimate_program(&program, &config);
    println!("Estimation took: {:.2?} ({seconds:.1}s of machining)", start.elapsed());
}

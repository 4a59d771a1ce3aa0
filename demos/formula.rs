use clap::Parser;

use interval_expr::ast::Expr;
use interval_expr::types::Int;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Values for x, y and z. Without any, the built-in test cases are run.
    #[arg(value_name = "INT", allow_negative_numbers = true)]
    inputs: Vec<Int>,

    /// Enable debug logging.
    #[clap(long)]
    debug: bool,
}

const BOUNDS: [(&str, Int, Int); 3] = [("x", -5, 5), ("y", 10, 30), ("z", 45, 65)];

const CASES: [([Int; 3], Int); 3] = [([3, 29, 50], 636), ([-2, 20, 62], 530), ([0, 12, 47], 220)];

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.debug {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let [x, y, z] = BOUNDS.map(|(_, lower, upper)| Expr::var(lower, upper));
    let f = (x + (y - Expr::lit(2)) * (z - Expr::lit(3))) / Expr::lit(2);

    println!("--- INFO ---");
    println!("f(x,y,z) = (x + (y - 2) * (z - 3)) / 2");
    println!("         = {}", f);
    for (name, lower, upper) in BOUNDS {
        println!("- {} <= {} <= {}", lower, name, upper);
    }
    let bounds = f.bounds();
    println!("Statically inferred bounds: {} <= f(x,y,z) <= {}", bounds.lower(), bounds.upper());

    if !args.inputs.is_empty() {
        let res = f.eval(&args.inputs)?;
        println!("f{:?} = {}", args.inputs, res);
        return Ok(());
    }

    println!("--- TEST CASES ---");
    for (i, (inputs, expected)) in CASES.iter().enumerate() {
        let res = f.eval(inputs)?;
        println!("Test #{}: f{:?} = {} (expected {})", i, inputs, res, expected);
        println!("- Correct: {}", if res == *expected { "YES" } else { "NO" });
    }

    Ok(())
}

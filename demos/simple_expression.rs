use mathexpr::{eval, ExecutionEnv, Result};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut env = ExecutionEnv::with_builtins();
    env.insert_variable("price", 120.0)?;
    env.insert_variable("volume", 3000.0)?;
    env.insert_unary("double", |x| x * 2.0)?;

    let expressions = [
        "2 + 3 * 4",
        "2^3^2",
        "2cos(0)",
        "max(-min(1, 3), 5)",
        "round(pi, 4)",
        "price > 100 && volume < 5000",
        "double(price) + 10",
        "1 / 0",
        "sin(",
    ];

    for expr in expressions {
        match eval(expr, &env) {
            Ok(value) => println!("{expr} = {value}"),
            Err(err) => println!("{expr} failed: {err}"),
        }
    }
    Ok(())
}

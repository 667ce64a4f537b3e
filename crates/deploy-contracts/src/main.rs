use {
    clap::Parser,
    deploy_contracts::{EXIT_FAILURE, EXIT_SUCCESS, arguments::Arguments},
    std::process::ExitCode,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from a `.env` file in the working directory act as environment
    // variables. The file is optional.
    dotenvy::dotenv().ok();

    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(if err.use_stderr() {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            });
        }
    };

    let mut config = observe::Config::new(&args.log_filter);
    if args.use_json_logs {
        config = config.with_json_format();
    }
    observe::tracing::initialize(&config);
    tracing::info!("running deployer with validated arguments:\n{}", args);

    ExitCode::from(deploy_contracts::exit_code(deploy_contracts::run(args)).await)
}

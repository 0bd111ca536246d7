use xcookie::{
    cli::{dispatch, get_log_level_from_verbose, parse_cli},
    error::default_error_handler,
};

fn main() {
    let cli = parse_cli();
    let log_level = get_log_level_from_verbose(cli.verbose);
    env_logger::Builder::new().filter_level(log_level).init();

    if let Err(err) = dispatch(cli.command) {
        default_error_handler(err);
    }
}

pub mod solver;
pub mod synthetic_svg;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

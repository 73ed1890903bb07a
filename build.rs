fn main() {
    // ESP-IDF link arguments are only needed for the board build.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

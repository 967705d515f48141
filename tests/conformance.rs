mod conformance {
    pub mod common;
    mod evaluate;
    mod resolve;
    mod validate;
}

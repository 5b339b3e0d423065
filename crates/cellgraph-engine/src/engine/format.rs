/// Render a number as the shortest text that parses back to the same value.
///
/// `30.00` renders as `30`, `2e5` as `200000`. Negative zero renders as `0`.
/// Non-finite values have no such text and render as `#NAN!` / `#INF!`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

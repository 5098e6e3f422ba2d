/// Create a [`Vec`](crate::Vec) containing the arguments.
///
/// - `vec![]` creates an empty vector without allocating.
/// - `vec![elem; n]` clones `elem` into `n` slots.
/// - `vec![a, b, c]` moves each value into a new vector.
#[macro_export]
macro_rules! vec {
    () => (
        $crate::vec::Vec::new()
    );
    ($elem:expr; $n:expr) => (
        $crate::vec::Vec::from_elem(&$elem, $n)
    );
    ($($x:expr),+ $(,)?) => (
        $crate::vec::Vec::from([$($x),+])
    );
}

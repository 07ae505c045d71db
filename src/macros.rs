/// Builds a [`Record`](crate::Record) from `field => value` pairs.
///
/// Values go through `Into<Value>`, so text, integers, floats and booleans can be
/// mixed. Fields keep the order they are listed in.
///
/// ```rust
/// use compressed_sheets::{record, Value};
///
/// let row = record! {
///     "name" => "Alice",
///     "age" => 30,
/// };
/// assert_eq!(row["age"], Value::Integer(30));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };

    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($field, $value);
        )+
        record
    }};
}

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use quire_engine::editing::Node;

/// `rows` x `cols` table where every third row starts with a cell merged
/// over two columns
#[allow(dead_code)]
pub fn generate_table(rows: usize, cols: usize) -> Node {
    Node::table(
        (0..rows)
            .map(|row| {
                let cells = if row % 3 == 0 && cols > 1 {
                    std::iter::once(Node::cell("merged").with_span(1, 2))
                        .chain((2..cols).map(|col| Node::cell(&format!("r{row}c{col}"))))
                        .collect()
                } else {
                    (0..cols)
                        .map(|col| Node::cell(&format!("r{row}c{col}")))
                        .collect()
                };
                Node::row(cells)
            })
            .collect(),
    )
}

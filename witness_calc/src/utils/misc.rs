use std::collections::{HashMap, HashSet};

pub fn topo_order_and_is_dag(
    vertices: &HashSet<usize>,
    edges: &HashMap<usize, HashSet<usize>>,
) -> (Vec<usize>, bool) {
    let queue: Vec<usize> = topo_order(vertices, edges);
    let is_dag = queue.len() == vertices.len();
    (queue, is_dag)
}

// vertices on a cycle are left out of the result
pub fn topo_order(vertices: &HashSet<usize>, edges: &HashMap<usize, HashSet<usize>>) -> Vec<usize> {
    let mut queue: Vec<usize> = Vec::new();
    let mut in_deg: HashMap<usize, usize> = vertices.iter().map(|&v| (v, 0)).collect();
    for tos in edges.values() {
        for &to in tos.iter() {
            in_deg.entry(to).and_modify(|e| *e += 1);
        }
    }
    let mut roots: Vec<usize> = vertices
        .iter()
        .copied()
        .filter(|v| in_deg[v] == 0)
        .collect();
    roots.sort_unstable();
    queue.extend(roots);
    let mut i = 0;
    while i < queue.len() {
        let from = queue[i];
        i += 1;
        if let Some(tos) = edges.get(&from) {
            let mut ready = Vec::new();
            for &to in tos.iter() {
                if let Some(e) = in_deg.get_mut(&to) {
                    *e -= 1;
                    if *e == 0 {
                        ready.push(to);
                    }
                }
            }
            ready.sort_unstable();
            queue.extend(ready);
        }
    }
    queue
}

/// Renders the `[i][j]` suffix of the `index`-th element of an array with
/// the given dimensions, in row-major order.
pub fn position_suffix(dims: &[usize], mut index: usize) -> String {
    let mut parts = vec![0; dims.len()];
    for (k, &d) in dims.iter().enumerate().rev() {
        if d == 0 {
            continue;
        }
        parts[k] = index % d;
        index /= d;
    }
    parts.iter().map(|p| format!("[{}]", p)).collect()
}

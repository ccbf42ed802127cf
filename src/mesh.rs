use ndarray::{Array2, ArrayView1};

use crate::error::{FemError, Result};

pub mod mesh_view;

/// Immutable 2D mesh with integer labels on every entity.
///
/// Elements are node-index tuples wound counter-clockwise. Six-node elements
/// list their nodes as corner, mid(0-1), corner, mid(1-2), corner, mid(2-0).
#[derive(Clone, Debug)]
pub struct Mesh {
    pub nodes: Array2<f64>,
    pub node_labels: Vec<i32>,
    pub edges: Vec<[usize; 2]>,
    pub edge_labels: Vec<i32>,
    pub elements: Vec<Vec<usize>>,
    pub element_labels: Vec<i32>,
}
impl Mesh {
    pub fn new(
        nodes: Array2<f64>,
        node_labels: Vec<i32>,
        edges: Vec<[usize; 2]>,
        edge_labels: Vec<i32>,
        elements: Vec<Vec<usize>>,
        element_labels: Vec<i32>,
    ) -> Result<Self> {
        if nodes.ncols() != 2 {
            return Err(FemError::schema(format!(
                "node coordinates must have 2 columns, got {}",
                nodes.ncols()
            )));
        }
        if node_labels.len() != nodes.nrows() {
            return Err(FemError::schema(
                "nodes and nodes labels lists must have the same length",
            ));
        }
        if edge_labels.len() != edges.len() {
            return Err(FemError::schema(
                "edges and edges labels lists must have the same length",
            ));
        }
        if element_labels.len() != elements.len() {
            return Err(FemError::schema(
                "elements and elements labels lists must have the same length",
            ));
        }
        let node_num = nodes.nrows();
        for (ielem, inodes) in elements.iter().enumerate() {
            if inodes.len() < 3 {
                return Err(FemError::schema(format!(
                    "element {ielem} has {} nodes, less than 3 nodes don't make a surface",
                    inodes.len()
                )));
            }
            if let Some(&bad) = inodes.iter().find(|&&inode| inode >= node_num) {
                return Err(FemError::schema(format!(
                    "element {ielem} references missing node {bad}"
                )));
            }
        }
        for (iedge, inodes) in edges.iter().enumerate() {
            if let Some(&bad) = inodes.iter().find(|&&inode| inode >= node_num) {
                return Err(FemError::schema(format!(
                    "edge {iedge} references missing node {bad}"
                )));
            }
        }
        Ok(Self {
            nodes,
            node_labels,
            edges,
            edge_labels,
            elements,
            element_labels,
        })
    }
    pub fn node_num(&self) -> usize {
        self.nodes.nrows()
    }
    pub fn elem_num(&self) -> usize {
        self.elements.len()
    }
    pub fn edge_num(&self) -> usize {
        self.edges.len()
    }
    pub fn node(&self, inode: usize) -> ArrayView1<'_, f64> {
        self.nodes.row(inode)
    }
    pub fn edge_length(&self, iedge: usize) -> f64 {
        let [n0, n1] = self.edges[iedge];
        let dx = self.nodes[[n1, 0]] - self.nodes[[n0, 0]];
        let dy = self.nodes[[n1, 1]] - self.nodes[[n0, 1]];
        (dx * dx + dy * dy).sqrt()
    }
    /// Structured `n x n` node grid over `[0, length]^2`, each cell split into
    /// two linear triangles along its lower-left/upper-right diagonal.
    ///
    /// Elements carry label 0, nodes label 0. Only boundary edges are listed,
    /// labelled lower = 1, right = 2, upper = 3, left = 4.
    pub fn create_square_tri_mesh(n: usize, length: f64) -> Mesh {
        assert!(n >= 2, "a square mesh needs at least 2 nodes per side");
        let h = length / (n - 1) as f64;
        let idx = |i: usize, j: usize| j * n + i;
        let mut nodes = Array2::<f64>::zeros((n * n, 2));
        for j in 0..n {
            for i in 0..n {
                nodes[[idx(i, j), 0]] = i as f64 * h;
                nodes[[idx(i, j), 1]] = j as f64 * h;
            }
        }
        let mut elements = Vec::with_capacity(2 * (n - 1) * (n - 1));
        for j in 0..n - 1 {
            for i in 0..n - 1 {
                let a = idx(i, j);
                let b = idx(i + 1, j);
                let c = idx(i + 1, j + 1);
                let d = idx(i, j + 1);
                elements.push(vec![a, b, c]);
                elements.push(vec![a, c, d]);
            }
        }
        let (edges, edge_labels) = Self::square_boundary_edges(n, 1, &idx);
        let element_labels = vec![0; elements.len()];
        Mesh {
            nodes,
            node_labels: vec![0; n * n],
            edges,
            edge_labels,
            elements,
            element_labels,
        }
    }
    /// Same layout as [`Mesh::create_square_tri_mesh`] with `n` corner nodes
    /// per side, but with six-node quadratic triangles.
    pub fn create_square_tri6_mesh(n: usize, length: f64) -> Mesh {
        assert!(n >= 2, "a square mesh needs at least 2 corner nodes per side");
        let m = 2 * (n - 1) + 1;
        let h = length / (m - 1) as f64;
        let idx = |i: usize, j: usize| j * m + i;
        let mut nodes = Array2::<f64>::zeros((m * m, 2));
        for j in 0..m {
            for i in 0..m {
                nodes[[idx(i, j), 0]] = i as f64 * h;
                nodes[[idx(i, j), 1]] = j as f64 * h;
            }
        }
        let mut elements = Vec::with_capacity(2 * (n - 1) * (n - 1));
        for cj in 0..n - 1 {
            for ci in 0..n - 1 {
                let (i, j) = (2 * ci, 2 * cj);
                let a = idx(i, j);
                let b = idx(i + 2, j);
                let c = idx(i + 2, j + 2);
                let d = idx(i, j + 2);
                let ab = idx(i + 1, j);
                let bc = idx(i + 2, j + 1);
                let ac = idx(i + 1, j + 1);
                let cd = idx(i + 1, j + 2);
                let da = idx(i, j + 1);
                elements.push(vec![a, ab, b, bc, c, ac]);
                elements.push(vec![a, ac, c, cd, d, da]);
            }
        }
        let (edges, edge_labels) = Self::square_boundary_edges(m, 2, &idx);
        let element_labels = vec![0; elements.len()];
        Mesh {
            nodes,
            node_labels: vec![0; m * m],
            edges,
            edge_labels,
            elements,
            element_labels,
        }
    }
    fn square_boundary_edges(
        m: usize,
        step: usize,
        idx: &dyn Fn(usize, usize) -> usize,
    ) -> (Vec<[usize; 2]>, Vec<i32>) {
        let mut edges = Vec::new();
        let mut labels = Vec::new();
        let last = m - 1;
        for k in (0..last).step_by(step) {
            edges.push([idx(k, 0), idx(k + step, 0)]);
            labels.push(1);
        }
        for k in (0..last).step_by(step) {
            edges.push([idx(last, k), idx(last, k + step)]);
            labels.push(2);
        }
        for k in (0..last).step_by(step) {
            edges.push([idx(last - k, last), idx(last - k - step, last)]);
            labels.push(3);
        }
        for k in (0..last).step_by(step) {
            edges.push([idx(0, last - k), idx(0, last - k - step)]);
            labels.push(4);
        }
        (edges, labels)
    }
}

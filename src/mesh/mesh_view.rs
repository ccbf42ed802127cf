use std::collections::BTreeSet;

use ndarray::Array2;

use crate::{
    error::{FemError, Result},
    mesh::Mesh,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    WholeMesh,
    Labels(Vec<i32>),
}

/// Label-filtered part of a [`Mesh`].
///
/// Keeps the elements whose label is selected, the nodes they reference and
/// every edge whose nodes all belong to the view. Local node ids follow the
/// ascending global ids.
#[derive(Clone, Debug)]
pub struct MeshView<'a> {
    pub mesh: &'a Mesh,
    pub selection: Selection,
    pub ielements: Vec<usize>,
    pub iedges: Vec<usize>,
    pub local_to_global: Vec<usize>,
    global_to_local: Vec<Option<usize>>,
}
impl<'a> MeshView<'a> {
    pub fn whole_mesh(mesh: &'a Mesh) -> Self {
        let node_num = mesh.node_num();
        Self {
            mesh,
            selection: Selection::WholeMesh,
            ielements: (0..mesh.elem_num()).collect(),
            iedges: (0..mesh.edge_num()).collect(),
            local_to_global: (0..node_num).collect(),
            global_to_local: (0..node_num).map(Some).collect(),
        }
    }
    pub fn with_labels(mesh: &'a Mesh, labels: &[i32]) -> Result<Self> {
        let ielements: Vec<usize> = mesh
            .element_labels
            .iter()
            .enumerate()
            .filter(|(_, label)| labels.contains(label))
            .map(|(ielem, _)| ielem)
            .collect();
        if ielements.is_empty() {
            return Err(FemError::schema(format!(
                "no element carries any of the labels {labels:?}"
            )));
        }
        let inodes: BTreeSet<usize> = ielements
            .iter()
            .flat_map(|&ielem| mesh.elements[ielem].iter().copied())
            .collect();
        let local_to_global: Vec<usize> = inodes.into_iter().collect();
        let mut global_to_local = vec![None; mesh.node_num()];
        for (ilocal, &iglobal) in local_to_global.iter().enumerate() {
            global_to_local[iglobal] = Some(ilocal);
        }
        let iedges = mesh
            .edges
            .iter()
            .enumerate()
            .filter(|(_, inodes)| inodes.iter().all(|&n| global_to_local[n].is_some()))
            .map(|(iedge, _)| iedge)
            .collect();
        Ok(Self {
            mesh,
            selection: Selection::Labels(labels.to_vec()),
            ielements,
            iedges,
            local_to_global,
            global_to_local,
        })
    }
    pub fn new(mesh: &'a Mesh, selection: Selection) -> Result<Self> {
        match selection {
            Selection::WholeMesh => Ok(Self::whole_mesh(mesh)),
            Selection::Labels(labels) => Self::with_labels(mesh, &labels),
        }
    }
    pub fn node_num(&self) -> usize {
        self.local_to_global.len()
    }
    pub fn elem_num(&self) -> usize {
        self.ielements.len()
    }
    pub fn to_local(&self, iglobal: usize) -> Option<usize> {
        self.global_to_local.get(iglobal).copied().flatten()
    }
    pub fn contains_element(&self, ielem: usize) -> bool {
        match &self.selection {
            Selection::WholeMesh => ielem < self.mesh.elem_num(),
            Selection::Labels(labels) => labels.contains(&self.mesh.element_labels[ielem]),
        }
    }
    /// Coordinates of the given global nodes, one row per node.
    pub fn coords(&self, inodes: &[usize]) -> Array2<f64> {
        let mut coords = Array2::<f64>::zeros((inodes.len(), 2));
        for (i, &inode) in inodes.iter().enumerate() {
            coords.row_mut(i).assign(&self.mesh.node(inode));
        }
        coords
    }
    pub fn element_labels(&self) -> BTreeSet<i32> {
        self.ielements
            .iter()
            .map(|&ielem| self.mesh.element_labels[ielem])
            .collect()
    }
    /// Every label carried by a node, edge or element of the view.
    pub fn labels(&self) -> BTreeSet<i32> {
        let mut labels = self.element_labels();
        labels.extend(self.iedges.iter().map(|&iedge| self.mesh.edge_labels[iedge]));
        labels.extend(
            self.local_to_global
                .iter()
                .map(|&inode| self.mesh.node_labels[inode]),
        );
        labels
    }
}

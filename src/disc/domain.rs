use hashbrown::HashMap;
use num_complex::Complex64;

use crate::{
    disc::{
        boundary::{BoundaryCondition, BoundaryContribution, BoundaryEdges},
        kernel::InterpolationKernel,
    },
    error::{FemError, Result},
    media::{Coefficients, Field, FemMedium},
    mesh::{
        Mesh,
        mesh_view::{MeshView, Selection},
    },
};

/// Sparse matrix entries in coordinate form; duplicates are summed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triplets {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<Complex64>,
}
impl Triplets {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            cols: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }
    pub fn push(&mut self, row: usize, col: usize, value: Complex64) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Moves the entries of `other` into `self`, shifting their indices.
    pub fn append_with_offset(&mut self, other: Triplets, offset: usize) {
        self.rows.extend(other.rows.into_iter().map(|r| r + offset));
        self.cols.extend(other.cols.into_iter().map(|c| c + offset));
        self.values.extend(other.values);
    }
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((&r, &c), &v)| (r, c, v))
    }
}

/// Element sides keyed by their sorted corner nodes, with every
/// `(element, local edge)` they belong to.
type EdgeAdjacency = HashMap<[usize; 2], Vec<(usize, usize)>>;

fn edge_adjacency(mesh: &Mesh) -> EdgeAdjacency {
    let mut adjacency = EdgeAdjacency::new();
    for (ielem, inodes) in mesh.elements.iter().enumerate() {
        let Ok(kernel) = InterpolationKernel::for_element_size(inodes.len()) else {
            continue;
        };
        for (iedge_local, local) in kernel.edge_local_nodes().iter().enumerate() {
            let (a, b) = (inodes[local[0]], inodes[local[1]]);
            adjacency
                .entry([a.min(b), a.max(b)])
                .or_default()
                .push((ielem, iedge_local));
        }
    }
    adjacency
}

/// Part of the mesh made of a single medium, discretized with a single
/// kernel.
///
/// DOFs are numbered field by field: `dof = field_index * node_num + local
/// node`, so each field owns a contiguous block.
#[derive(Clone, Debug)]
pub struct Domain<'a> {
    pub view: MeshView<'a>,
    pub medium_label: i32,
    pub medium: FemMedium,
    pub kernel: InterpolationKernel,
    pub boundaries: Vec<BoundaryEdges>,
    /// Sorted corner pairs of element sides shared with elements outside
    /// the domain.
    pub interfaces: Vec<[usize; 2]>,
}

impl<'a> Domain<'a> {
    pub fn new(
        view: MeshView<'a>,
        media: &HashMap<i32, FemMedium>,
        conditions: &HashMap<i32, BoundaryCondition>,
    ) -> Result<Self> {
        // A label selection names its media through element labels; node and
        // edge labels may reuse the same numbers for boundaries.
        let candidates = match view.selection {
            Selection::Labels(_) => view.element_labels(),
            Selection::WholeMesh => view.labels(),
        };
        let material_labels: Vec<i32> = candidates
            .into_iter()
            .filter(|label| media.contains_key(label))
            .collect();
        let medium_label = match material_labels.as_slice() {
            [label] => *label,
            _ => {
                return Err(FemError::schema(format!(
                    "a domain needs exactly one material label, found {material_labels:?}"
                )));
            }
        };
        let medium = media[&medium_label].clone();
        let kernel = Self::select_kernel(&view)?;

        let mesh = view.mesh;
        let adjacency = edge_adjacency(mesh);
        let mut interfaces: Vec<[usize; 2]> = adjacency
            .iter()
            .filter(|(_, owners)| {
                owners.iter().any(|&(e, _)| view.contains_element(e))
                    && owners.iter().any(|&(e, _)| !view.contains_element(e))
            })
            .map(|(&pair, _)| pair)
            .collect();
        interfaces.sort_unstable();

        let mut boundaries: Vec<BoundaryEdges> = Vec::new();
        for &iedge in view.iedges.iter() {
            let label = mesh.edge_labels[iedge];
            let Some(condition) = conditions.get(&label) else {
                continue;
            };
            let [n0, n1] = mesh.edges[iedge];
            let Some(owners) = adjacency.get(&[n0.min(n1), n0.max(n1)]) else {
                log::warn!("edge {iedge} (label {label}) is not the side of any element, skipped");
                continue;
            };
            if owners.iter().any(|&(e, _)| !view.contains_element(e)) {
                log::warn!(
                    "edge {iedge} (label {label}) lies on an interface of the medium {medium_label} domain, skipped"
                );
                continue;
            }
            let Some(&(ielem, iedge_local)) =
                owners.iter().find(|&&(e, _)| view.contains_element(e))
            else {
                continue;
            };
            let element = &mesh.elements[ielem];
            let inodes: Vec<usize> = kernel.edge_local_nodes()[iedge_local]
                .iter()
                .map(|&k| element[k])
                .collect();
            match boundaries.iter_mut().find(|b| b.label == label) {
                Some(group) => {
                    group.iedges.push(iedge);
                    group.inodes.push(inodes);
                }
                None => boundaries.push(BoundaryEdges {
                    label,
                    condition: condition.clone(),
                    iedges: vec![iedge],
                    inodes: vec![inodes],
                }),
            }
        }
        boundaries.sort_by_key(|b| b.label);

        log::debug!(
            "domain of medium {medium_label} ({}): {} elements, {} nodes, {:?} kernel, {} boundary groups, {} interface sides",
            medium.medium.kind(),
            view.elem_num(),
            view.node_num(),
            kernel,
            boundaries.len(),
            interfaces.len()
        );
        Ok(Self {
            view,
            medium_label,
            medium,
            kernel,
            boundaries,
            interfaces,
        })
    }
    fn select_kernel(view: &MeshView) -> Result<InterpolationKernel> {
        let mut sizes = view
            .ielements
            .iter()
            .map(|&ielem| view.mesh.elements[ielem].len());
        let first = sizes
            .next()
            .ok_or_else(|| FemError::schema("a domain needs at least one element"))?;
        if let Some(other) = sizes.find(|&size| size != first) {
            return Err(FemError::schema(format!(
                "mixed element arity in one domain: {first} and {other} nodes"
            )));
        }
        InterpolationKernel::for_element_size(first)
    }
    pub fn fields(&self) -> &'static [Field] {
        self.medium.fields()
    }
    pub fn dof_num(&self) -> usize {
        self.fields().len() * self.view.node_num()
    }
    pub fn dof(&self, local_node: usize, field: Field) -> Result<usize> {
        let ifield = self.medium.field_index(field).ok_or_else(|| {
            FemError::schema(format!(
                "{} medium carries no {field:?} field",
                self.medium.medium.kind()
            ))
        })?;
        Ok(ifield * self.view.node_num() + local_node)
    }
    fn local_node(&self, iglobal: usize) -> Result<usize> {
        self.view
            .to_local(iglobal)
            .ok_or_else(|| FemError::schema(format!("node {iglobal} is outside the domain")))
    }
    /// Domain-local matrix entries at the frequency of `bundle`: every field
    /// receives `stiffness * H + mass * Q` in its own block.
    pub fn assemble(&self, bundle: &Coefficients) -> Result<Triplets> {
        let n = self.kernel.dofs_per_element();
        let fields = self.fields();
        let multipliers = fields
            .iter()
            .map(|&field| bundle.multipliers(field))
            .collect::<Result<Vec<_>>>()?;
        let node_num = self.view.node_num();
        let mut triplets = Triplets::with_capacity(self.view.elem_num() * fields.len() * n * n);
        for &ielem in self.view.ielements.iter() {
            let element = &self.view.mesh.elements[ielem];
            let coords = self.view.coords(element);
            let matrices = self
                .kernel
                .local_matrices(coords.view())
                .map_err(|err| err.in_element(ielem))?;
            let local: Vec<usize> = element
                .iter()
                .map(|&inode| self.local_node(inode))
                .collect::<Result<_>>()?;
            for (ifield, m) in multipliers.iter().enumerate() {
                let offset = ifield * node_num;
                for i in 0..n {
                    for j in 0..n {
                        triplets.push(
                            offset + local[i],
                            offset + local[j],
                            m.stiffness * matrices.h[[i, j]] + m.mass * matrices.q[[i, j]],
                        );
                    }
                }
            }
        }
        Ok(triplets)
    }
    /// Right hand side entries and eliminated DOFs of the domain's boundary
    /// groups, in domain-local numbering.
    pub fn boundary_contributions(&self, bundle: &Coefficients) -> Result<Vec<BoundaryContribution>> {
        let mut entries = Vec::new();
        let j = Complex64::i();
        for group in self.boundaries.iter() {
            match group.condition {
                BoundaryCondition::Impedance { amplitude } => {
                    if self.medium.field_index(Field::Pressure).is_none() {
                        log::warn!(
                            "impedance label {} ignored: {} medium has no pressure field",
                            group.label,
                            self.medium.medium.kind()
                        );
                        continue;
                    }
                    let scale = amplitude / (j * bundle.omega);
                    for (&iedge, inodes) in group.iedges.iter().zip(group.inodes.iter()) {
                        let integral = self.kernel.boundary_integral(self.view.mesh.edge_length(iedge));
                        for (k, &inode) in inodes.iter().enumerate() {
                            entries.push(BoundaryContribution::Contribute {
                                row: self.dof(self.local_node(inode)?, Field::Pressure)?,
                                value: integral[k] * scale,
                            });
                        }
                    }
                }
                BoundaryCondition::PressureRelease => {
                    self.push_removals(&mut entries, group, &[Field::Pressure])?;
                }
                BoundaryCondition::Clamped => {
                    self.push_removals(
                        &mut entries,
                        group,
                        &[Field::DisplacementX, Field::DisplacementY],
                    )?;
                }
            }
        }
        Ok(entries)
    }
    fn push_removals(
        &self,
        entries: &mut Vec<BoundaryContribution>,
        group: &BoundaryEdges,
        fields: &[Field],
    ) -> Result<()> {
        for &field in fields {
            if self.medium.field_index(field).is_none() {
                continue;
            }
            for inodes in group.inodes.iter() {
                for &inode in inodes {
                    entries.push(BoundaryContribution::Remove {
                        row: self.dof(self.local_node(inode)?, field)?,
                    });
                }
            }
        }
        Ok(())
    }
}

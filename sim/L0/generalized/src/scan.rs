//! Tree traversal primitives.
//!
//! Every evaluation pass is built from three shapes of computation:
//!
//! - [`by_joint_type`]: apply a per-joint-type function to all links of that
//!   type at once and scatter the per-dof results back into dof order.
//! - [`forward`]: propagate values from the root toward the leaves; each
//!   link sees its parent's finished value.
//! - [`backward`]: fold values from the leaves toward the root; each link's
//!   value is complete before it is merged into its parent.
//!
//! Traversal orders come from the [`Mechanism`]'s precomputed topological
//! order, so none of these allocate beyond their output.

use crate::{DynamicsError, JointType, Mechanism, Result};

/// Links sharing one exact joint type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointGroup {
    /// The shared joint type.
    pub joint: JointType,
    /// Member links, ascending.
    pub links: Vec<usize>,
    /// Dofs of the member links, link-major.
    pub dofs: Vec<usize>,
}

/// Apply `f` to each joint-type group and gather one value per dof.
///
/// `f` must return exactly `group.dofs.len()` values, in the order of
/// `group.dofs`.
///
/// # Errors
///
/// [`DynamicsError::ShapeMismatch`] if a group returns the wrong count.
pub fn by_joint_type<T, F>(mech: &Mechanism, mut f: F) -> Result<Vec<T>>
where
    T: Clone + Default,
    F: FnMut(&JointGroup) -> Vec<T>,
{
    let mut out = vec![T::default(); mech.dof_count()];
    for group in mech.joint_groups() {
        let values = f(group);
        if values.len() != group.dofs.len() {
            return Err(DynamicsError::ShapeMismatch {
                what: "joint group output",
                expected: group.dofs.len(),
                actual: values.len(),
            });
        }
        for (&dof, value) in group.dofs.iter().zip(values) {
            out[dof] = value;
        }
    }
    Ok(out)
}

/// Propagate from root to leaves.
///
/// Link `i` receives `f(&value[parent(i)], i)`, or `f(&root, i)` for the
/// root.
pub fn forward<T, F>(mech: &Mechanism, root: T, mut f: F) -> Vec<T>
where
    T: Clone + Default,
    F: FnMut(&T, usize) -> T,
{
    let mut out = vec![T::default(); mech.link_count()];
    for &link in mech.topological_order() {
        let value = match mech.parent(link) {
            Some(p) => f(&out[p], link),
            None => f(&root, link),
        };
        out[link] = value;
    }
    out
}

/// Fold from leaves to root.
///
/// Visits links deepest first and calls `combine(&mut value[parent], &value[child])`,
/// so on return every entry holds its whole subtree.
pub fn backward<T, F>(mech: &Mechanism, mut values: Vec<T>, mut combine: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&mut T, &T),
{
    for &link in mech.topological_order().iter().rev() {
        if let Some(p) = mech.parent(link) {
            let child = values[link].clone();
            combine(&mut values[p], &child);
        }
    }
    values
}

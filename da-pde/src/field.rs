
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// Fixed Dirichlet values for the four edges of a rectangular grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
  pub top: f64,
  pub bottom: f64,
  pub left: f64,
  pub right: f64,
}

impl Boundary {
  pub const fn uniform(value: f64) -> Boundary {
    Boundary {
      top: value,
      bottom: value,
      left: value,
      right: value,
    }
  }

  /// Write the pinned edge values onto `u`. Corners take the
  /// horizontal edges' values.
  pub fn apply(&self, mut u: ArrayViewMut2<f64>) {
    let (ny, nx) = u.dim();
    assert!(ny >= 3 && nx >= 3, "grid has no interior cells: {:?}", (ny, nx));

    u.column_mut(0).fill(self.left);
    u.column_mut(nx - 1).fill(self.right);
    u.row_mut(0).fill(self.top);
    u.row_mut(ny - 1).fill(self.bottom);
  }
}

/// A dense scalar field on a regular grid, edges held at fixed values.
/// The boundary is applied once at construction; the integrator never
/// writes to edge cells afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
  values: Array2<f64>,
  boundary: Boundary,
}

impl GridField {
  pub fn new(mut values: Array2<f64>, boundary: Boundary) -> GridField {
    boundary.apply(values.view_mut());
    GridField { values, boundary }
  }

  /// Constant interior value inside the pinned edges.
  pub fn filled(ny: usize, nx: usize, interior: f64, boundary: Boundary) -> GridField {
    GridField::new(Array2::from_elem((ny, nx), interior), boundary)
  }

  pub fn values(&self) -> ArrayView2<f64> {
    self.values.view()
  }

  pub fn boundary(&self) -> &Boundary {
    &self.boundary
  }

  pub fn dim(&self) -> (usize, usize) {
    self.values.dim()
  }
}

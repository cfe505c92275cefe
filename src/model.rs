use crate::error::{Result, StructureError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ────────────────────────────────────────────────────────────────────────────
// CoreDoc – JSON persistence wrapper
// ────────────────────────────────────────────────────────────────────────────

/// Version tag written into every [`CoreDoc`].
pub const CORE_DOC_VERSION: u32 = 1;

/// A core whose symbols and expressions are plain strings, as read from disk.
pub type SymbolicCore = Core<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreDoc {
    pub version: u32,
    pub core: SymbolicCore,
}

impl CoreDoc {
    pub fn new(core: SymbolicCore) -> Self {
        Self {
            version: CORE_DOC_VERSION,
            core,
        }
    }

    /// Save the document as pretty-printed JSON.
    pub fn save_to_json<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        std::io::Write::write_all(&mut writer, b"\n")?;
        Ok(())
    }

    /// Load a document from JSON, checking the version and the core's consistency.
    pub fn load_from_json<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let doc: CoreDoc = serde_json::from_reader(reader)?;
        if doc.version != CORE_DOC_VERSION {
            anyhow::bail!("Unsupported version: {}", doc.version);
        }
        doc.core.check()?;
        Ok(doc)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Category
// ────────────────────────────────────────────────────────────────────────────

/// One of the four contiguous blocks of the structure matrix, in block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "x", alias = "stor")]
    Storage,
    #[serde(alias = "w", alias = "diss")]
    Dissipation,
    #[serde(alias = "y")]
    Port,
    #[serde(alias = "cy", alias = "conn")]
    Connector,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Storage,
        Category::Dissipation,
        Category::Port,
        Category::Connector,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Storage => "storage",
            Category::Dissipation => "dissipation",
            Category::Port => "port",
            Category::Connector => "connector",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "storage" | "stor" | "x" => Ok(Category::Storage),
            "dissipation" | "diss" | "w" => Ok(Category::Dissipation),
            "port" | "y" => Ok(Category::Port),
            "connector" | "conn" | "cy" => Ok(Category::Connector),
            _ => Err(StructureError::UnknownCategory(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dims
// ────────────────────────────────────────────────────────────────────────────

/// Per-category dimensions of a core. Always derived from the primary vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Dims {
    pub x: usize,
    pub w: usize,
    pub y: usize,
    pub cy: usize,
}

impl Dims {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Storage => self.x,
            Category::Dissipation => self.w,
            Category::Port => self.y,
            Category::Connector => self.cy,
        }
    }

    /// Size of the full structure matrix.
    pub fn total(&self) -> usize {
        self.x + self.w + self.y + self.cy
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StructureMatrix
// ────────────────────────────────────────────────────────────────────────────

/// A square matrix that is either known to be all zeros or stored densely.
///
/// Serialised as `{"zero": {"dim": n}}` or `{"dense": [[..], ..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(bound(serialize = "E: Serialize", deserialize = "E: Deserialize<'de>"))]
pub enum StructureMatrix<E> {
    Zero { dim: usize },
    Dense(#[serde(with = "rows")] Array2<E>),
}

impl<E> StructureMatrix<E> {
    pub fn zeros(dim: usize) -> Self {
        StructureMatrix::Zero { dim }
    }

    /// Wrap a dense matrix, rejecting non-square shapes.
    pub fn dense(matrix: Array2<E>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(StructureError::NotSquare { rows, cols });
        }
        Ok(StructureMatrix::Dense(matrix))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, StructureMatrix::Zero { .. })
    }

    /// Row (and column) count. Reports the row count for a malformed dense matrix.
    pub fn dim(&self) -> usize {
        match self {
            StructureMatrix::Zero { dim } => *dim,
            StructureMatrix::Dense(m) => m.nrows(),
        }
    }

    /// Entry at `(row, col)`; `None` for a zero matrix or an index outside the shape.
    pub fn get(&self, row: usize, col: usize) -> Option<&E> {
        match self {
            StructureMatrix::Zero { .. } => None,
            StructureMatrix::Dense(m) => m.get((row, col)),
        }
    }

    pub(crate) fn check_square(&self) -> Result<()> {
        if let StructureMatrix::Dense(m) = self {
            let (rows, cols) = m.dim();
            if rows != cols {
                return Err(StructureError::NotSquare { rows, cols });
            }
        }
        Ok(())
    }
}

impl<E: Clone + Default> StructureMatrix<E> {
    /// Materialise the matrix, filling a zero matrix with `E::default()`.
    pub fn to_dense(&self) -> Array2<E> {
        match self {
            StructureMatrix::Zero { dim } => Array2::from_elem((*dim, *dim), E::default()),
            StructureMatrix::Dense(m) => m.clone(),
        }
    }
}

mod rows {
    use ndarray::Array2;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<E: Serialize, S: Serializer>(
        matrix: &Array2<E>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<&E>> = matrix.outer_iter().map(|r| r.into_iter().collect()).collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, E: Deserialize<'de>, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Array2<E>, D::Error> {
        let rows: Vec<Vec<E>> = Vec::deserialize(deserializer)?;
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(D::Error::custom(format!(
                "row {} has {} entries, expected {}",
                i,
                row.len(),
                n_cols
            )));
        }
        let flat: Vec<E> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((n_rows, n_cols), flat).map_err(D::Error::custom)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core
// ────────────────────────────────────────────────────────────────────────────

/// A port-Hamiltonian core: category vectors plus the block structure matrix.
///
/// `S` is the symbol type of the variables, `E` the expression type of the
/// gradient, the dissipation outputs and the matrix entries. The structure
/// matrix `m` is laid out as `[storage | dissipation | port | connector]`;
/// row `k` and column `k` always refer to the same variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core<S, E> {
    #[serde(default)]
    pub label: String,
    /// Storage states.
    pub x: Vec<S>,
    /// Cached energy gradient, aligned with `x` when present.
    #[serde(default)]
    pub dx_h: Option<Vec<E>>,
    /// Dissipation variables.
    pub w: Vec<S>,
    /// Dissipation outputs, aligned with `w`.
    pub z: Vec<E>,
    /// Port inputs.
    pub u: Vec<S>,
    /// Port outputs.
    pub y: Vec<S>,
    /// Connector inputs.
    pub cu: Vec<S>,
    /// Connector outputs.
    pub cy: Vec<S>,
    /// Full structure matrix.
    pub m: StructureMatrix<E>,
    /// Linear dissipation matrix, indexed over the dissipation block only.
    #[serde(default)]
    pub zl: Option<StructureMatrix<E>>,
}

impl<S, E> Core<S, E> {
    /// An empty core with a zero structure matrix.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            x: Vec::new(),
            dx_h: None,
            w: Vec::new(),
            z: Vec::new(),
            u: Vec::new(),
            y: Vec::new(),
            cu: Vec::new(),
            cy: Vec::new(),
            m: StructureMatrix::zeros(0),
            zl: None,
        }
    }

    pub fn dims(&self) -> Dims {
        Dims {
            x: self.x.len(),
            w: self.w.len(),
            y: self.y.len(),
            cy: self.cy.len(),
        }
    }

    /// Verify that every companion vector and matrix agrees with the dimensions.
    pub fn check(&self) -> Result<()> {
        let dims = self.dims();
        if let Some(g) = &self.dx_h {
            expect_len("dx_h", dims.x, g.len())?;
        }
        expect_len("z", dims.w, self.z.len())?;
        expect_len("u", dims.y, self.u.len())?;
        expect_len("cu", dims.cy, self.cu.len())?;
        self.m.check_square()?;
        expect_len("m", dims.total(), self.m.dim())?;
        if let Some(zl) = &self.zl {
            zl.check_square()?;
            expect_len("zl", dims.w, zl.dim())?;
        }
        Ok(())
    }
}

impl<S: PartialEq, E> Core<S, E> {
    /// Find the category and category-relative index of a variable symbol.
    ///
    /// Inputs are searched before outputs, so a symbol present in both `u`
    /// and `y` resolves through `u`.
    pub fn locate(&self, symbol: &S) -> Option<(Category, usize)> {
        let lookups: [(Category, &[S]); 6] = [
            (Category::Storage, &self.x),
            (Category::Dissipation, &self.w),
            (Category::Port, &self.u),
            (Category::Connector, &self.cu),
            (Category::Port, &self.y),
            (Category::Connector, &self.cy),
        ];
        lookups.into_iter().find_map(|(category, symbols)| {
            symbols
                .iter()
                .position(|s| s == symbol)
                .map(|index| (category, index))
        })
    }
}

pub(crate) fn expect_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(StructureError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

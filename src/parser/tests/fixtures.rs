//! Synthetic .re1 file rendering for tests

use crate::models::RaoLayout;

/// Description of a synthetic run rendered to .re1 text
#[derive(Debug, Clone)]
pub struct Re1Fixture {
    pub cardids: Vec<String>,
    pub heads: Vec<f64>,
    pub freqs: Vec<f64>,
    pub ndof: usize,
    /// Write NDOF on the run-size line (otherwise three integers)
    pub explicit_ndof: bool,
    /// Vessel speeds [m/s], one block each
    pub speeds: Vec<f64>,
    /// Append XMTN/ZMTN to condition lines
    pub with_motion_reference: bool,
    pub layout: RaoLayout,
    /// Prefix heading and RAO lines with an index column
    pub index_columns: bool,
    /// Write exponents with Fortran `D`
    pub fortran_exponents: bool,
}

impl Default for Re1Fixture {
    fn default() -> Self {
        Self {
            cardids: vec!["Test vessel".to_string(), "Loading condition 1".to_string()],
            heads: vec![90.0],
            freqs: vec![0.5],
            ndof: 6,
            explicit_ndof: true,
            speeds: vec![0.0],
            with_motion_reference: true,
            layout: RaoLayout::Interleaved,
            index_columns: true,
            fortran_exponents: false,
        }
    }
}

/// Deterministic RAO value for a cell, distinct for every index triple
pub fn sample_value(speed: usize, head: usize, freq: usize, dof: usize) -> (f64, f64) {
    let base = 0.01 * (1 + speed) as f64;
    (
        base * (1.0 + head as f64) + 0.1 * freq as f64 + 0.001 * dof as f64,
        -base * (dof as f64 + 1.0) + 0.05 * freq as f64,
    )
}

impl Re1Fixture {
    pub fn with_layout(mut self, layout: RaoLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_grid(mut self, heads: &[f64], freqs: &[f64]) -> Self {
        self.heads = heads.to_vec();
        self.freqs = freqs.to_vec();
        self
    }

    /// Render using [`sample_value`] for every cell
    pub fn render(&self) -> String {
        self.render_with(sample_value)
    }

    /// Render with a caller-supplied value for each (speed, head, freq, dof)
    pub fn render_with(&self, value: impl Fn(usize, usize, usize, usize) -> (f64, f64)) -> String {
        let mut out = String::new();
        out.push_str("  VERES  version 4.08   SINTEF Ocean\n");
        out.push_str("\n  MOTION TRANSFER FUNCTIONS\n");
        for id in &self.cardids {
            out.push_str(&format!("  {}\n", id));
        }
        out.push_str("   1025.000\t9.81000\n");
        out.push_str("   100.000   20.000    6.500\n");
        out.push_str("\n    -1.500    8.000\n");
        if self.explicit_ndof {
            out.push_str(&format!(
                "   {}   {}   {}   {}\n",
                self.speeds.len(),
                self.heads.len(),
                self.freqs.len(),
                self.ndof
            ));
        } else {
            out.push_str(&format!(
                "   {}   {}   {}\n",
                self.speeds.len(),
                self.heads.len(),
                self.freqs.len()
            ));
        }

        for (iv, vel) in self.speeds.iter().enumerate() {
            if self.with_motion_reference {
                out.push_str(&format!("   {:.3}   0.010  -0.020   2.500   9.000\n", vel));
            } else {
                out.push_str(&format!("   {:.3}   0.010  -0.020\n", vel));
            }
            for (ih, head) in self.heads.iter().enumerate() {
                if self.index_columns {
                    out.push_str(&format!("   {}   {:.1}\n", ih + 1, head));
                } else {
                    out.push_str(&format!("   {:.1}\n", head));
                }
            }
            match self.layout {
                RaoLayout::Interleaved => {
                    for ih in 0..self.heads.len() {
                        for (ifr, freq) in self.freqs.iter().enumerate() {
                            out.push_str(&format!("   {:.6}\n", freq));
                            for dof in 0..self.ndof {
                                let (re, im) = value(iv, ih, ifr, dof);
                                out.push_str(&self.rao_line(dof, re, im));
                            }
                        }
                    }
                }
                RaoLayout::TableFirst => {
                    for freq in &self.freqs {
                        out.push_str(&format!("   {:.6}\n", freq));
                    }
                    for ih in 0..self.heads.len() {
                        for ifr in 0..self.freqs.len() {
                            for dof in 0..self.ndof {
                                let (re, im) = value(iv, ih, ifr, dof);
                                out.push_str(&self.rao_line(dof, re, im));
                            }
                        }
                    }
                }
            }
        }
        out
    }

    fn rao_line(&self, dof: usize, re: f64, im: f64) -> String {
        let re = self.number(re);
        let im = self.number(im);
        if self.index_columns {
            format!("   {}   {}   {}\n", dof + 1, re, im)
        } else {
            format!("   {}   {}\n", re, im)
        }
    }

    fn number(&self, value: f64) -> String {
        let text = format!("{:.7E}", value);
        if self.fortran_exponents {
            text.replace('E', "D")
        } else {
            text
        }
    }
}

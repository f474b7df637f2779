//! Settings for one decompilation run.

use undis_gen::GenConfig;
use undis_scan::ScanConfig;

/// Everything that shapes the output besides the artifact itself.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DecompileConfig {
    pub scan: ScanConfig,
    pub gen: GenConfig,
    /// Prefix the text with the provenance header.
    pub header: bool,
    /// Attach the disassembly around a parse failure to the error.
    pub show_context: bool,
}

impl Default for DecompileConfig {
    fn default() -> Self {
        DecompileConfig {
            scan: ScanConfig::default(),
            gen: GenConfig::default(),
            header: true,
            show_context: false,
        }
    }
}

impl DecompileConfig {
    /// Body text only, no header.
    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    #[must_use]
    pub fn with_line_map(mut self) -> Self {
        self.gen.line_map = true;
        self
    }
}

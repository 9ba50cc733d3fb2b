// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neuromorph I/O

Everything around the serialization core that touches the filesystem:

- `loader` - [`MorphologyLoader`] trait and the [`SwcLoader`]
- `transform` - [`recenter`], applied before extraction when requested
- `sink` - all-or-nothing output writing through temporary files
- `pipeline` - per-file conversion ([`convert_file`]) and batches ([`convert_batch`])

```text
 input.swc ─► loader ─► (recenter) ─► TreeWalker ─┬─► Document ──► input.json
                                                  └─► float32 ────► input.bin
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod pipeline;
pub mod sink;
pub mod transform;

pub use loader::{load_morphology, DefaultLoader, LoadError, MorphologyLoader, SwcLoader};
pub use pipeline::{
    convert_batch, convert_file, output_base, BatchSummary, ConversionOptions, ConversionReport,
    ConvertError,
};
pub use sink::{write_atomic, write_all_or_nothing};
pub use transform::{recenter, soma_center};

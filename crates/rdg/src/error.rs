// Reliac
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdgError {
    /// A dependency traversal revisited a node that was still being resolved.
    /// Fatal to the whole traversal; no partial ordering is produced. Callers
    /// must abort analysis of the affected node instead of retrying with the
    /// graph unchanged.
    #[error("cyclic dependency detected while resolving node {id}")]
    CyclicDependency { id: String },

    /// A model annotation that should be numeric is not. Raised by upstream
    /// builders while parsing behavioral-model annotations; the model algebra
    /// itself treats probabilities as opaque text and never raises this.
    #[error("model annotation is not numeric: {raw}")]
    InvalidModelValue { raw: String },
}

pub type RdgResult<T> = Result<T, RdgError>;

use crate::coordinate::Coordinate;
use crate::pdoc::{RepositoryRef, PDoc};
use crate::version::Version;
use graft_util::errors::GraftResult;
use std::path::Path;

/// The external collaborator that turns a coordinate (or a filesystem path)
/// into a parsed [`PDoc`].
///
/// The resolution core (`graft-resolver`) is generic over this trait and
/// never touches XML, HTTP, or the filesystem directly: it only consumes
/// already-parsed trees. A concrete implementation backed by `quick-xml`
/// and `reqwest` lives in `graft-maven`; tests use an in-memory fixture
/// instead.
pub trait PdocSource {
    /// Loads the PDoc governing `coordinate`/`version`, trying the local
    /// repository first and then the ordered remote repository list.
    /// Returns `Ok(None)` if every strategy reports a clean miss.
    fn load_by_coordinate(
        &self,
        coordinate: &Coordinate,
        version: &Version,
    ) -> impl std::future::Future<Output = GraftResult<Option<PDoc>>> + Send;

    /// Loads a PDoc from an explicit filesystem path, used by the first two
    /// parent-retrieval strategies (`relativePath` and `../pom.xml`).
    fn load_by_path(&self, path: &Path) -> impl std::future::Future<Output = GraftResult<Option<PDoc>>> + Send;

    /// Merges a PDoc's own declared `<repositories>` ahead of whatever
    /// remote repositories this source already consults, de-duplicated by
    /// URL (Analyzer step 3). A source with a fixed repository list (or a
    /// test fixture) can leave this as a no-op.
    fn register_repositories(&self, _declared: &[RepositoryRef]) {}
}

use crate::diagnosis::Profile;
use crate::{NodeId, RevisionError, UpdateDiscipline};

impl UpdateDiscipline {
    /// True for disciplines which describe time series (everything except steady state).
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, UpdateDiscipline::SteadyState)
    }

    /// True if `node` is updated in the transition `time -> time + 1` of `profile`.
    ///
    /// Under the asynchronous disciplines this is read from the update trace recorded in
    /// the (completed) profile.
    pub fn is_active(&self, profile: &Profile, time: usize, node: NodeId) -> bool {
        match self {
            UpdateDiscipline::SteadyState | UpdateDiscipline::Synchronous => true,
            UpdateDiscipline::Asynchronous | UpdateDiscipline::MultiAsynchronous => {
                profile.is_updated(time, node)
            }
        }
    }

    /// True if inconsistencies of this discipline can be attributed to the topology of the
    /// network (two transitions with equal inputs but different outputs).
    pub fn detects_topological_errors(&self) -> bool {
        matches!(
            self,
            UpdateDiscipline::Synchronous | UpdateDiscipline::Asynchronous
        )
    }

    /// The name of this discipline used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            UpdateDiscipline::SteadyState => "SteadyStateUpdater",
            UpdateDiscipline::Synchronous => "SyncUpdater",
            UpdateDiscipline::Asynchronous => "AsyncUpdater",
            UpdateDiscipline::MultiAsynchronous => "CompleteUpdater",
        }
    }
}

impl TryFrom<&str> for UpdateDiscipline {
    type Error = RevisionError;

    /// Parse a discipline name (case insensitive). Both the long updater names and short
    /// aliases are accepted.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "steadystateupdater" | "steadystate" | "ss" => Ok(UpdateDiscipline::SteadyState),
            "syncupdater" | "sync" | "s" => Ok(UpdateDiscipline::Synchronous),
            "asyncupdater" | "async" | "a" => Ok(UpdateDiscipline::Asynchronous),
            "completeupdater" | "multiasyncupdater" | "multiasync" | "ma" => {
                Ok(UpdateDiscipline::MultiAsynchronous)
            }
            _ => Err(RevisionError::UnknownUpdater(value.to_string())),
        }
    }
}

use crate::files::FileInfo;

/// Change in the set of files of a workspace.
#[derive(Copy, Clone, Debug)]
pub enum WorkspaceEvent<'a> {
    /// A new record was stored for a URI (first version of a file, or a newer version replacing
    /// the previous record).
    Inserted(&'a FileInfo),
    /// The status of a stored record changed.
    Updated(&'a FileInfo),
    /// The record is about to be dropped from the workspace.
    Removed(&'a FileInfo),
}

impl<'a> WorkspaceEvent<'a> {
    pub fn file(&self) -> &'a FileInfo {
        match *self {
            WorkspaceEvent::Inserted(f) | WorkspaceEvent::Updated(f) | WorkspaceEvent::Removed(f) => f,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkspaceEvent::Inserted(_) => "inserted",
            WorkspaceEvent::Updated(_) => "updated",
            WorkspaceEvent::Removed(_) => "removed",
        }
    }
}

pub(super) type Subscriber = Box<dyn FnMut(&WorkspaceEvent<'_>) + Send>;

/// Delivers an event to all subscribers, in subscription order.
pub(super) fn emit(subscribers: &mut [Subscriber], event: WorkspaceEvent<'_>) {
    tracing::trace!("{} {}", event.name(), event.file().uri());
    for subscriber in subscribers.iter_mut() {
        subscriber(&event);
    }
}

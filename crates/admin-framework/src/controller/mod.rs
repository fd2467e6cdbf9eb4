//! # Lifecycle Controllers
//!
//! Each view type is a small struct composed from the same parts: a
//! [`Resource`] (model, snapshot, flags), a source to talk to, optional
//! [`Hooks`](crate::hooks::Hooks) and, for lists, the pagination/filter/order
//! state. Nothing is inherited; a detail view *contains* a show view, a
//! list-edit view *contains* a list view.
//!
//! | Controller | Operations | Failure kinds |
//! |------------|------------|---------------|
//! | [`ShowController`] | `initialize`, `refresh` | load, refresh |
//! | [`DetailController`] | show + `next_change` | refresh |
//! | [`EditController`] | `initialize`, `reload`, `update`, `no_change` | load, update |
//! | [`CreateController`] | `create`, `submit` | create |
//! | [`ListController`] | `load_list` + page/filter/order ops | list load, list refresh |
//! | [`ListEditController`] | parent load, then list | load + list kinds |
//!
//! Failures are recorded on the controller (`error`, `error_kind`) and logged.
//! Nothing is returned to the caller.

pub mod create;
pub mod detail;
pub mod edit;
pub mod list;
pub mod list_edit;
pub mod modal;
pub mod resource;
pub mod show;

pub use create::CreateController;
pub use detail::{DetailController, ModelChanges};
pub use edit::{EditController, EditOptions};
pub use list::{ListChanges, ListController, Paginator, PAGE_SIZE_LIMITS};
pub use list_edit::ListEditController;
pub use modal::ModalState;
pub use resource::{LifecycleState, Resource};
pub use show::ShowController;

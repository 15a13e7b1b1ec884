use crate::core::moment::Moment;
use crate::state::coordinator::WidgetId;

/// Actions emitted by widgets in `InteractionResult`.
/// These flow upward from widgets to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    Opened { id: WidgetId },
    Closed { id: WidgetId },
    /// The widget needs geometry that is only valid once the host has laid
    /// out the current frame. The host answers by calling `place` after
    /// layout settles.
    MeasureAfterLayout { id: WidgetId },
    ValueCommitted { id: WidgetId, moment: Moment },
}

mod event;
mod sink;

pub use event::{
    Event, PayloadEdgeDeselect, PayloadEdgeSelect, PayloadFocus, PayloadLayoutChange,
    PayloadNodeDeselect, PayloadNodeDragEnd, PayloadNodeDragStart, PayloadNodeHoverEnter,
    PayloadNodeHoverLeave, PayloadNodeMove, PayloadNodeSelect, PayloadUndo,
};

pub use sink::EventSink;

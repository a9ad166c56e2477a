pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod region;
    pub mod video_metadata;
}

pub mod detection {
    pub mod domain {
        pub mod color_range;
        pub mod contour_tracer;
        pub mod mask;
        pub mod region_detector;
    }
    pub mod infrastructure;
}

pub mod annotation {
    pub mod domain {
        pub mod frame_annotator;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod domain {
        pub mod frame_source;
        pub mod video_writer;
    }
    pub mod infrastructure;
}

pub mod recording {
    pub mod domain {
        pub mod episode_naming;
        pub mod episode_recorder;
        pub mod recorder_error;
    }
}

pub mod notification {
    pub mod domain {
        pub mod notifier;
    }
    pub mod infrastructure;
}

pub mod presentation {
    pub mod domain {
        pub mod frame_presenter;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod pipeline_context;
    pub mod pipeline_error;
    pub mod pipeline_logger;
    pub mod watch_stream_use_case;
}

#[cfg(test)]
pub(crate) mod test_support;

//! Request-cycle tests driving the engine through raw frames

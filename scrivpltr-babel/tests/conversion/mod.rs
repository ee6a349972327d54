mod pipeline;
mod round_trip;

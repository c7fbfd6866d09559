mod coordinates;
mod images;

pub mod icontrol;
